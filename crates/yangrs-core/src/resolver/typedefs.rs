//! Typedef name collision validation.
//!
//! Invoked once per module after parsing, before compilation. Typedef names
//! must be unique at the top level of the module together with all of its
//! submodules, must never match a built-in type, and a scoped typedef must
//! not shadow a typedef of any lexically enclosing node or of the top level
//! (RFC 7950 sect. 5.5 and 6.2.1). Cousin scopes may share names.

use std::collections::HashSet;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::schema::{BuiltinType, ModuleId, ParsedModule, Typedef};

/// Validate typedef naming across a module and its submodules.
///
/// Top-level typedefs of the module and of every included submodule are
/// collected first; scoped typedefs are then checked unit by unit against
/// their siblings, their ancestor scopes, and the collected top-level set.
///
/// # Errors
///
/// [`Error::Collision`] naming the typedef and the kind of collision.
pub fn check_typedefs(ctx: &Context, module: ModuleId) -> Result<()> {
    let m = ctx.module(module);
    let Some(parsed) = m.parsed.as_ref() else {
        return Ok(());
    };

    let mut globals: HashSet<&str> = HashSet::new();

    for typedef in &parsed.typedefs {
        check_top_level(typedef, &mut globals)?;
    }
    for include in &parsed.includes {
        let Some(sub_id) = include.submodule else {
            continue;
        };
        for typedef in &ctx.submodule(sub_id).parsed.typedefs {
            check_top_level(typedef, &mut globals)?;
        }
    }

    check_scoped_unit(parsed, &globals)?;
    for include in &parsed.includes {
        let Some(sub_id) = include.submodule else {
            continue;
        };
        check_scoped_unit(&ctx.submodule(sub_id).parsed, &globals)?;
    }

    Ok(())
}

fn check_builtin(typedef: &Typedef) -> Result<()> {
    if BuiltinType::from_name(&typedef.name).is_some() {
        return Err(Error::Collision(format!(
            "invalid name \"{}\" of typedef - name collision with a built-in type",
            typedef.name
        )));
    }
    Ok(())
}

fn check_top_level<'a>(typedef: &'a Typedef, globals: &mut HashSet<&'a str>) -> Result<()> {
    check_builtin(typedef)?;
    if !globals.insert(typedef.name.as_str()) {
        return Err(Error::Collision(format!(
            "invalid name \"{}\" of typedef - name collision with another top-level type",
            typedef.name
        )));
    }
    Ok(())
}

fn check_scoped_unit(unit: &ParsedModule, globals: &HashSet<&str>) -> Result<()> {
    for node in &unit.nodes {
        let typedefs = node.typedefs();
        for (i, typedef) in typedefs.iter().enumerate() {
            check_builtin(typedef)?;

            if typedefs[..i].iter().any(|t| t.name == typedef.name) {
                return Err(Error::Collision(format!(
                    "invalid name \"{}\" of typedef in node \"{}\" - name collision with sibling type",
                    typedef.name, node.name
                )));
            }

            let mut ancestor = node.parent;
            while let Some(parent_id) = ancestor {
                let parent = unit.node(parent_id);
                if parent.typedefs().iter().any(|t| t.name == typedef.name) {
                    return Err(Error::Collision(format!(
                        "invalid name \"{}\" of typedef in node \"{}\" - name collision with another scoped type",
                        typedef.name, node.name
                    )));
                }
                ancestor = parent.parent;
            }

            if globals.contains(typedef.name.as_str()) {
                return Err(Error::Collision(format!(
                    "invalid name \"{}\" of typedef in node \"{}\" - scoped type collides with a top-level type",
                    typedef.name, node.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Include, Module, ParsedNode, ParsedNodeKind, Submodule};

    fn module_with_parsed(typedefs: Vec<Typedef>) -> Module {
        let mut m = Module::new("m", "urn:m", "m");
        m.parsed = Some(ParsedModule {
            typedefs,
            ..ParsedModule::default()
        });
        m
    }

    fn container(typedefs: Vec<Typedef>) -> ParsedNode {
        ParsedNode::new(
            "c",
            ParsedNodeKind::Container {
                typedefs,
                children: Vec::new(),
            },
        )
    }

    #[test]
    fn test_distinct_names_pass() {
        let mut ctx = Context::new();
        let m = ctx.insert_module(module_with_parsed(vec![
            Typedef::new("a", "string"),
            Typedef::new("b", "uint8"),
        ]));
        assert!(check_typedefs(&ctx, m).is_ok());
    }

    #[test]
    fn test_builtin_name_rejected() {
        let mut ctx = Context::new();
        let m = ctx.insert_module(module_with_parsed(vec![Typedef::new("union", "string")]));
        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(matches!(err, Error::Collision(_)));
        assert!(err.to_string().contains("built-in"));
    }

    #[test]
    fn test_duplicate_top_level_rejected() {
        let mut ctx = Context::new();
        let m = ctx.insert_module(module_with_parsed(vec![
            Typedef::new("t", "string"),
            Typedef::new("t", "uint8"),
        ]));
        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(matches!(err, Error::Collision(_)));
    }

    #[test]
    fn test_submodule_collides_with_module_top_level() {
        let mut ctx = Context::new();
        let mut sub = Submodule::new("s", "m");
        sub.parsed.typedefs.push(Typedef::new("t", "uint8"));
        let sub = ctx.insert_submodule(sub);

        let mut module = module_with_parsed(vec![Typedef::new("t", "string")]);
        {
            let parsed = module.parsed.as_mut().unwrap();
            let mut include = Include::new("s");
            include.submodule = Some(sub);
            parsed.includes.push(include);
        }
        let m = ctx.insert_module(module);

        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(matches!(err, Error::Collision(_)));
        assert!(err.to_string().contains("top-level"));
    }

    #[test]
    fn test_sibling_scoped_collision() {
        let mut ctx = Context::new();
        let mut module = module_with_parsed(vec![]);
        module
            .parsed
            .as_mut()
            .unwrap()
            .add_node(container(vec![
                Typedef::new("t", "string"),
                Typedef::new("t", "uint8"),
            ]));
        let m = ctx.insert_module(module);

        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(err.to_string().contains("sibling"));
    }

    #[test]
    fn test_scoped_shadowing_ancestor_scope() {
        let mut ctx = Context::new();
        let mut module = module_with_parsed(vec![]);
        {
            let parsed = module.parsed.as_mut().unwrap();
            let outer = parsed.add_node(container(vec![Typedef::new("t", "string")]));
            let mut inner = container(vec![Typedef::new("t", "uint8")]);
            inner.parent = Some(outer);
            parsed.add_node(inner);
        }
        let m = ctx.insert_module(module);

        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(err.to_string().contains("scoped type"));
    }

    #[test]
    fn test_scoped_shadowing_top_level() {
        let mut ctx = Context::new();
        let mut module = module_with_parsed(vec![Typedef::new("t", "string")]);
        module
            .parsed
            .as_mut()
            .unwrap()
            .add_node(container(vec![Typedef::new("t", "uint8")]));
        let m = ctx.insert_module(module);

        let err = check_typedefs(&ctx, m).unwrap_err();
        assert!(err.to_string().contains("top-level"));
    }

    #[test]
    fn test_cousin_scopes_may_share_names() {
        let mut ctx = Context::new();
        let mut module = module_with_parsed(vec![]);
        {
            let parsed = module.parsed.as_mut().unwrap();
            parsed.add_node(container(vec![Typedef::new("t", "string")]));
            parsed.add_node(container(vec![Typedef::new("t", "uint8")]));
        }
        let m = ctx.insert_module(module);

        assert!(check_typedefs(&ctx, m).is_ok());
    }

    #[test]
    fn test_module_without_parsed_facet_passes() {
        let mut ctx = Context::new();
        let m = ctx.insert_module(Module::new("m", "urn:m", "m"));
        assert!(check_typedefs(&ctx, m).is_ok());
    }
}
