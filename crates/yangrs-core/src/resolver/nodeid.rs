//! Schema-nodeid resolution.
//!
//! A schema-nodeid is a `/`-separated path of `[prefix:]name` segments
//! through the compiled tree: absolute when it starts with `/` (resolved from
//! the top level of the segment's module), descendant otherwise (resolved
//! from a context node). Prefixes are resolved in the context module;
//! unprefixed segments stay in it.

use bitflags::bitflags;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::lex;
use crate::resolver::prefix::resolve_prefix;
use crate::schema::{CompiledNodeId, CompiledNodeKind, ModuleId, NodeType, NodeTypeSet};

bitflags! {
    /// Flags describing where a schema-nodeid resolution ended up.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ResolveFlags: u16 {
        /// The path entered an RPC/action input.
        const RPC_INPUT = 0x01;
        /// The path entered an RPC/action output.
        const RPC_OUTPUT = 0x02;
        /// The path crossed a notification.
        const NOTIFICATION = 0x04;
    }
}

/// Resolve a schema-nodeid to a compiled node.
///
/// With a `context_node` the nodeid is a descendant path and must not start
/// with `/`; without one it is absolute and must. `context_module` resolves
/// the prefixes and is the module of unprefixed segments. The final node's
/// type must be contained in `accept` unless the mask is empty. With
/// `implement` set, every module the walk crosses is marked implemented.
///
/// Status checking is disabled during resolution: deprecated and obsolete
/// nodes match like any other.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for a malformed path shape (wrong leading `/`,
///   bad separator, unexpected end of expression).
/// - [`Error::Reference`] for a prefix not defined in the context module.
/// - [`Error::NotFound`] when a segment matches no child.
/// - [`Error::Denied`] when the terminal node type is not acceptable, or an
///   implement marking conflicts with another implemented revision.
pub fn resolve_schema_nodeid(
    ctx: &mut Context,
    nodeid: &str,
    context_node: Option<CompiledNodeId>,
    context_module: ModuleId,
    accept: NodeTypeSet,
    implement: bool,
) -> Result<(CompiledNodeId, ResolveFlags)> {
    let kind = if context_node.is_some() {
        "descendant"
    } else {
        "absolute"
    };

    let mut id = nodeid;
    if context_node.is_some() {
        if id.starts_with('/') {
            return Err(Error::InvalidInput(format!(
                "invalid descendant-schema-nodeid value \"{nodeid}\" - absolute-schema-nodeid used"
            )));
        }
    } else {
        id = id.strip_prefix('/').ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid absolute-schema-nodeid value \"{nodeid}\" - missing starting \"/\""
            ))
        })?;
    }

    let mut current = context_node;
    let mut flags = ResolveFlags::empty();

    loop {
        if id.is_empty() {
            return Err(Error::InvalidInput(format!(
                "invalid {kind}-schema-nodeid value \"{nodeid}\" - unexpected end of expression"
            )));
        }

        let (prefix, name) = lex::parse_nodeid(&mut id).map_err(|_| {
            Error::InvalidInput(format!(
                "invalid {kind}-schema-nodeid value \"{nodeid}\" - unexpected end of expression"
            ))
        })?;
        let consumed = &nodeid[..nodeid.len() - id.len()];

        let module = match prefix {
            Some(p) => resolve_prefix(ctx, context_module, p).ok_or_else(|| {
                Error::Reference(format!(
                    "invalid {kind}-schema-nodeid value \"{consumed}\" - prefix \"{p}\" not defined in module \"{}\"",
                    ctx.module(context_module).name
                ))
            })?,
            None => context_module,
        };

        if implement && !ctx.module(module).implemented {
            ctx.set_implemented(module)?;
        }

        // Under an RPC/action, "input" and "output" select the corresponding
        // half directly; any other name is looked up in the default (input)
        // child set.
        let inout = current.and_then(|cur| match &ctx.node(cur).kind {
            CompiledNodeKind::Action { input, output } => match name {
                "input" => Some((*input, ResolveFlags::RPC_INPUT)),
                "output" => Some((*output, ResolveFlags::RPC_OUTPUT)),
                _ => None,
            },
            _ => None,
        });

        if let Some((target, flag)) = inout {
            let Some(target) = target else {
                return Err(Error::NotFound(format!(
                    "invalid {kind}-schema-nodeid value \"{consumed}\" - target node not found"
                )));
            };
            flags |= flag;
            current = Some(target);
        } else {
            let Some(child) = find_child(ctx, current, module, name) else {
                return Err(Error::NotFound(format!(
                    "invalid {kind}-schema-nodeid value \"{consumed}\" - target node not found"
                )));
            };
            if ctx.node(child).node_type() == NodeType::Notification {
                flags |= ResolveFlags::NOTIFICATION;
            }
            current = Some(child);
        }

        if id.is_empty() {
            break;
        }
        id = id.strip_prefix('/').ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid {kind}-schema-nodeid value \"{consumed}\" - missing \"/\" as node-identifier separator"
            ))
        })?;
    }

    let Some(target) = current else {
        return Err(Error::Internal(format!(
            "schema-nodeid \"{nodeid}\" resolved without a target node"
        )));
    };
    let target_type = ctx.node(target).node_type();
    if !accept.is_empty() && !accept.contains(target_type.as_set()) {
        return Err(Error::Denied(format!(
            "invalid {kind}-schema-nodeid value \"{nodeid}\" - target is a {} node",
            target_type.as_str()
        )));
    }

    Ok((target, flags))
}

/// Find a direct child by local name and owning module.
///
/// With no parent the top level of `module`'s compiled tree is searched.
/// Choice and case nodes are traversed transparently: their descendants count
/// as direct children, while the choice/case itself still matches when named
/// explicitly. Under an action the default (input) child set is searched.
fn find_child(
    ctx: &Context,
    parent: Option<CompiledNodeId>,
    module: ModuleId,
    name: &str,
) -> Option<CompiledNodeId> {
    let children: &[CompiledNodeId] = match parent {
        None => ctx
            .module(module)
            .compiled
            .as_ref()
            .map_or(&[], |c| c.data.as_slice()),
        Some(p) => ctx.node_children(p, false),
    };

    for &child_id in children {
        let child = ctx.node(child_id);
        if child.name == name && child.module == module {
            return Some(child_id);
        }
        if matches!(child.node_type(), NodeType::Choice | NodeType::Case) {
            if let Some(found) = find_child(ctx, Some(child_id), module, name) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CompiledImport, CompiledModule, CompiledNode, Module};

    /// Add a node under a parent, wiring both directions.
    fn add_child(
        ctx: &mut Context,
        parent: CompiledNodeId,
        name: &str,
        module: ModuleId,
        kind: CompiledNodeKind,
    ) -> CompiledNodeId {
        let mut node = CompiledNode::new(name, module, kind);
        node.parent = Some(parent);
        let id = ctx.add_node(node);
        match &mut ctx.node_mut(parent).kind {
            CompiledNodeKind::Container { children }
            | CompiledNodeKind::Choice { children }
            | CompiledNodeKind::Case { children }
            | CompiledNodeKind::List { children }
            | CompiledNodeKind::InOut { children, .. }
            | CompiledNodeKind::Notification { children } => children.push(id),
            _ => panic!("parent kind cannot hold children"),
        }
        id
    }

    struct Fixture {
        ctx: Context,
        module: ModuleId,
        top: CompiledNodeId,
        doit: CompiledNodeId,
        input_leaf: CompiledNodeId,
        case_leaf: CompiledNodeId,
    }

    /// module m:
    ///   container top { leaf a; choice ch { case c1 { leaf b; } } }
    ///   rpc doit { input { leaf in-a; } output { leaf out-b; } }
    ///   notification alarm { leaf n; }
    fn fixture() -> Fixture {
        let mut ctx = Context::new();
        let mut m = Module::new("m", "urn:m", "m");
        m.compiled = Some(CompiledModule::default());
        let module = ctx.insert_module(m);

        let top = ctx.add_node(CompiledNode::new(
            "top",
            module,
            CompiledNodeKind::Container { children: vec![] },
        ));
        add_child(&mut ctx, top, "a", module, CompiledNodeKind::Leaf);
        let ch = add_child(
            &mut ctx,
            top,
            "ch",
            module,
            CompiledNodeKind::Choice { children: vec![] },
        );
        let c1 = add_child(
            &mut ctx,
            ch,
            "c1",
            module,
            CompiledNodeKind::Case { children: vec![] },
        );
        let case_leaf = add_child(&mut ctx, c1, "b", module, CompiledNodeKind::Leaf);

        let input = ctx.add_node(CompiledNode::new(
            "input",
            module,
            CompiledNodeKind::InOut {
                children: vec![],
                output: false,
            },
        ));
        let output = ctx.add_node(CompiledNode::new(
            "output",
            module,
            CompiledNodeKind::InOut {
                children: vec![],
                output: true,
            },
        ));
        let doit = ctx.add_node(CompiledNode::new(
            "doit",
            module,
            CompiledNodeKind::Action {
                input: Some(input),
                output: Some(output),
            },
        ));
        ctx.node_mut(input).parent = Some(doit);
        ctx.node_mut(output).parent = Some(doit);
        let input_leaf = add_child(&mut ctx, input, "in-a", module, CompiledNodeKind::Leaf);
        add_child(&mut ctx, output, "out-b", module, CompiledNodeKind::Leaf);

        let alarm = ctx.add_node(CompiledNode::new(
            "alarm",
            module,
            CompiledNodeKind::Notification { children: vec![] },
        ));
        add_child(&mut ctx, alarm, "n", module, CompiledNodeKind::Leaf);

        let compiled = ctx.module_mut(module).compiled.as_mut().unwrap();
        compiled.data.extend([top, doit, alarm]);

        Fixture {
            ctx,
            module,
            top,
            doit,
            input_leaf,
            case_leaf,
        }
    }

    #[test]
    fn test_absolute_path() {
        let mut f = fixture();
        let (node, flags) = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/a",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(f.ctx.node(node).name, "a");
        assert_eq!(flags, ResolveFlags::empty());
    }

    #[test]
    fn test_descendant_into_rpc_input() {
        let mut f = fixture();
        let (node, flags) = resolve_schema_nodeid(
            &mut f.ctx,
            "input/in-a",
            Some(f.doit),
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(node, f.input_leaf);
        assert!(flags.contains(ResolveFlags::RPC_INPUT));
        assert!(!flags.contains(ResolveFlags::RPC_OUTPUT));
    }

    #[test]
    fn test_rpc_default_child_set_is_input() {
        let mut f = fixture();
        let (node, flags) = resolve_schema_nodeid(
            &mut f.ctx,
            "in-a",
            Some(f.doit),
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(node, f.input_leaf);
        assert!(flags.is_empty());

        // Output children are not reachable without the "output" segment.
        assert!(resolve_schema_nodeid(
            &mut f.ctx,
            "out-b",
            Some(f.doit),
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .is_err());
    }

    #[test]
    fn test_rpc_output_half() {
        let mut f = fixture();
        let (node, flags) = resolve_schema_nodeid(
            &mut f.ctx,
            "output/out-b",
            Some(f.doit),
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(f.ctx.node(node).name, "out-b");
        assert!(flags.contains(ResolveFlags::RPC_OUTPUT));
    }

    #[test]
    fn test_choice_and_case_are_transparent() {
        let mut f = fixture();
        let (node, _) = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/b",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(node, f.case_leaf);

        // The choice itself is still addressable by name.
        let (node, _) = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/ch",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(f.ctx.node(node).node_type(), NodeType::Choice);
    }

    #[test]
    fn test_notification_flag() {
        let mut f = fixture();
        let (_, flags) = resolve_schema_nodeid(
            &mut f.ctx,
            "/alarm/n",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert!(flags.contains(ResolveFlags::NOTIFICATION));
    }

    #[test]
    fn test_terminal_type_mask() {
        let mut f = fixture();
        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "/top",
            None,
            f.module,
            NodeTypeSet::LEAF | NodeTypeSet::LEAF_LIST,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Denied(_)));

        assert!(resolve_schema_nodeid(
            &mut f.ctx,
            "/top",
            None,
            f.module,
            NodeTypeSet::CONTAINER,
            false,
        )
        .is_ok());
    }

    #[test]
    fn test_path_shape_errors() {
        let mut f = fixture();

        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "top/a",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "/in-a",
            Some(f.doit),
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("unexpected end"));

        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_prefix_is_reference_error() {
        let mut f = fixture();
        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "/ghost:top",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Reference(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_missing_child_is_not_found() {
        let mut f = fixture();
        let err = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/zzz",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("/top/zzz"));
    }

    #[test]
    fn test_cross_module_segment_with_prefix() {
        let mut f = fixture();

        // Module "aug" grafts a leaf under /top, as an augment would.
        let mut aug = Module::new("aug", "urn:aug", "au");
        aug.compiled = Some(CompiledModule::default());
        let aug = f.ctx.insert_module(aug);
        add_child(&mut f.ctx, f.top, "grafted", aug, CompiledNodeKind::Leaf);

        // The context module binds the prefix "au" to it.
        f.ctx
            .module_mut(f.module)
            .compiled
            .as_mut()
            .unwrap()
            .imports
            .push(CompiledImport {
                prefix: "au".into(),
                module: aug,
            });

        let (node, _) = resolve_schema_nodeid(
            &mut f.ctx,
            "/top/au:grafted",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .unwrap();
        assert_eq!(f.ctx.node(node).name, "grafted");
        assert_eq!(f.ctx.node(node).module, aug);

        // The same local name does not match under the wrong module.
        assert!(resolve_schema_nodeid(
            &mut f.ctx,
            "/top/grafted",
            None,
            f.module,
            NodeTypeSet::empty(),
            false,
        )
        .is_err());
    }

    #[test]
    fn test_implement_marks_crossed_modules() {
        let mut f = fixture();
        assert!(!f.ctx.module(f.module).implemented);

        resolve_schema_nodeid(
            &mut f.ctx,
            "/top/a",
            None,
            f.module,
            NodeTypeSet::empty(),
            true,
        )
        .unwrap();
        assert!(f.ctx.module(f.module).implemented);
    }
}
