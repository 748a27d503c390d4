//! Type reference resolution.
//!
//! A type reference either names a built-in type or a typedef reachable from
//! the point of use: the lexical typedef chain of the enclosing node, the
//! module's top-level typedefs, then the top-level typedefs of each included
//! submodule. First match wins.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::resolver::prefix::resolve_prefix_parsed;
use crate::schema::{BuiltinType, ModuleId, ParsedNodeId, Typedef};

/// What a type reference resolved to.
#[derive(Debug)]
pub enum ResolvedType<'a> {
    /// A built-in type. Only reachable for unprefixed references.
    Builtin(BuiltinType),
    /// A typedef, with its defining module and, for scoped typedefs, the node
    /// that declares it.
    Typedef {
        typedef: &'a Typedef,
        module: ModuleId,
        node: Option<ParsedNodeId>,
    },
}

/// Resolve the type reference `id` as seen from `start_node` (the lexically
/// enclosing schema node, absent for top-level typedefs) inside
/// `start_module`.
///
/// An unprefixed name is first tested against the built-in set. A prefixed
/// name skips that test — built-ins are never prefix-qualified — and moves
/// the search to the module the prefix denotes; the lexical parent-chain walk
/// only applies when the search stays in the starting module.
///
/// # Errors
///
/// [`Error::NotFound`] for an unknown prefix, a search module without a
/// parsed facet, or a name that matches nothing.
pub fn find_type<'a>(
    ctx: &'a Context,
    id: &str,
    start_node: Option<ParsedNodeId>,
    start_module: ModuleId,
) -> Result<ResolvedType<'a>> {
    let (module, name) = match id.split_once(':') {
        Some((prefix, name)) => {
            let module = resolve_prefix_parsed(ctx, start_module, prefix).ok_or_else(|| {
                Error::NotFound(format!(
                    "prefix \"{prefix}\" of type reference \"{id}\" not resolved in module \"{}\"",
                    ctx.module(start_module).name
                ))
            })?;
            (module, name)
        }
        None => {
            if let Some(builtin) = BuiltinType::from_name(id) {
                return Ok(ResolvedType::Builtin(builtin));
            }
            (start_module, id)
        }
    };

    let parsed = ctx.module(module).parsed.as_ref().ok_or_else(|| {
        Error::NotFound(format!(
            "module \"{}\" of type reference \"{id}\" has no parsed schema",
            ctx.module(module).name
        ))
    })?;

    // Typedefs of the lexically enclosing nodes shadow top-level ones, but
    // only within the unit that contains the point of use.
    if module == start_module {
        if let Some(start) = start_node {
            let mut current = Some(start);
            while let Some(node_id) = current {
                let node = parsed.node(node_id);
                if let Some(typedef) = node.typedefs().iter().find(|t| t.name == name) {
                    return Ok(ResolvedType::Typedef {
                        typedef,
                        module,
                        node: Some(node_id),
                    });
                }
                current = node.parent;
            }
        }
    }

    if let Some(typedef) = parsed.typedefs.iter().find(|t| t.name == name) {
        return Ok(ResolvedType::Typedef {
            typedef,
            module,
            node: None,
        });
    }

    for include in &parsed.includes {
        let Some(sub_id) = include.submodule else {
            continue;
        };
        let sub = ctx.submodule(sub_id);
        if let Some(typedef) = sub.parsed.typedefs.iter().find(|t| t.name == name) {
            return Ok(ResolvedType::Typedef {
                typedef,
                module,
                node: None,
            });
        }
    }

    Err(Error::NotFound(format!(
        "type \"{id}\" not found in module \"{}\"",
        ctx.module(module).name
    )))
}
