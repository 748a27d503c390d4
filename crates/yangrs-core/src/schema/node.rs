//! Schema tree nodes, parsed and compiled.
//!
//! Node polymorphism is a tagged variant over the closed node-type set; the
//! per-facet accessors (`children`, `typedefs`) pattern-match the tag and
//! return an empty slice for kinds without that facet. No trait objects, no
//! downcasting.

use bitflags::bitflags;

use super::ids::{CompiledNodeId, ModuleId, ParsedNodeId};
use super::module::{Status, Typedef};

/// The type of a schema node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Container,
    Choice,
    Case,
    Leaf,
    LeafList,
    List,
    Anyxml,
    Anydata,
    Grouping,
    /// RPC or action.
    Action,
    Notification,
    /// RPC/action input or output.
    InOut,
}

bitflags! {
    /// A set of node types, used as the acceptable-terminal mask when
    /// resolving schema-nodeids.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NodeTypeSet: u16 {
        const CONTAINER = 0x0001;
        const CHOICE = 0x0002;
        const CASE = 0x0004;
        const LEAF = 0x0008;
        const LEAF_LIST = 0x0010;
        const LIST = 0x0020;
        const ANYXML = 0x0040;
        const ANYDATA = 0x0080;
        const GROUPING = 0x0100;
        const ACTION = 0x0200;
        const NOTIFICATION = 0x0400;
        const INOUT = 0x0800;
    }
}

impl NodeType {
    /// The singleton set containing this node type.
    #[must_use]
    pub fn as_set(self) -> NodeTypeSet {
        match self {
            Self::Container => NodeTypeSet::CONTAINER,
            Self::Choice => NodeTypeSet::CHOICE,
            Self::Case => NodeTypeSet::CASE,
            Self::Leaf => NodeTypeSet::LEAF,
            Self::LeafList => NodeTypeSet::LEAF_LIST,
            Self::List => NodeTypeSet::LIST,
            Self::Anyxml => NodeTypeSet::ANYXML,
            Self::Anydata => NodeTypeSet::ANYDATA,
            Self::Grouping => NodeTypeSet::GROUPING,
            Self::Action => NodeTypeSet::ACTION,
            Self::Notification => NodeTypeSet::NOTIFICATION,
            Self::InOut => NodeTypeSet::INOUT,
        }
    }

    /// Human-readable node type name for diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::List => "list",
            Self::Anyxml => "anyxml",
            Self::Anydata => "anydata",
            Self::Grouping => "grouping",
            Self::Action => "RPC/action",
            Self::Notification => "notification",
            Self::InOut => "input/output",
        }
    }
}

/// A node in a parsed (statement-level) schema tree.
///
/// Parsed nodes live in the arena of the module or submodule that declared
/// them; parsed trees never cross unit boundaries.
#[derive(Clone, Debug)]
pub struct ParsedNode {
    /// Node name.
    pub name: String,
    /// Lexically enclosing node, if any.
    pub parent: Option<ParsedNodeId>,
    /// Lifecycle status; absent statements default to current.
    pub status: Status,
    /// Type-specific payload.
    pub kind: ParsedNodeKind,
}

/// Type-specific payload of a parsed node.
#[derive(Clone, Debug)]
pub enum ParsedNodeKind {
    Container {
        typedefs: Vec<Typedef>,
        children: Vec<ParsedNodeId>,
    },
    Choice {
        children: Vec<ParsedNodeId>,
    },
    Case {
        children: Vec<ParsedNodeId>,
    },
    Leaf {
        /// Referenced type, possibly `prefix:name` qualified.
        type_name: String,
    },
    LeafList {
        type_name: String,
    },
    List {
        typedefs: Vec<Typedef>,
        children: Vec<ParsedNodeId>,
    },
    Anyxml,
    Anydata,
    Grouping {
        typedefs: Vec<Typedef>,
        children: Vec<ParsedNodeId>,
    },
    Action {
        typedefs: Vec<Typedef>,
        input: Option<ParsedNodeId>,
        output: Option<ParsedNodeId>,
    },
    InOut {
        typedefs: Vec<Typedef>,
        children: Vec<ParsedNodeId>,
    },
    Notification {
        typedefs: Vec<Typedef>,
        children: Vec<ParsedNodeId>,
    },
}

impl ParsedNode {
    /// Create a node with no parent and default status.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParsedNodeKind) -> Self {
        Self {
            name: name.into(),
            parent: None,
            status: Status::default(),
            kind,
        }
    }

    /// The node's type tag.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            ParsedNodeKind::Container { .. } => NodeType::Container,
            ParsedNodeKind::Choice { .. } => NodeType::Choice,
            ParsedNodeKind::Case { .. } => NodeType::Case,
            ParsedNodeKind::Leaf { .. } => NodeType::Leaf,
            ParsedNodeKind::LeafList { .. } => NodeType::LeafList,
            ParsedNodeKind::List { .. } => NodeType::List,
            ParsedNodeKind::Anyxml => NodeType::Anyxml,
            ParsedNodeKind::Anydata => NodeType::Anydata,
            ParsedNodeKind::Grouping { .. } => NodeType::Grouping,
            ParsedNodeKind::Action { .. } => NodeType::Action,
            ParsedNodeKind::InOut { .. } => NodeType::InOut,
            ParsedNodeKind::Notification { .. } => NodeType::Notification,
        }
    }

    /// Typedefs declared directly under this node.
    ///
    /// Empty for node types that cannot carry typedefs.
    #[must_use]
    pub fn typedefs(&self) -> &[Typedef] {
        match &self.kind {
            ParsedNodeKind::Container { typedefs, .. }
            | ParsedNodeKind::List { typedefs, .. }
            | ParsedNodeKind::Grouping { typedefs, .. }
            | ParsedNodeKind::Action { typedefs, .. }
            | ParsedNodeKind::InOut { typedefs, .. }
            | ParsedNodeKind::Notification { typedefs, .. } => typedefs,
            _ => &[],
        }
    }

    /// Direct children of this node.
    ///
    /// An action's input and output are reached through its own fields, not
    /// through this accessor.
    #[must_use]
    pub fn children(&self) -> &[ParsedNodeId] {
        match &self.kind {
            ParsedNodeKind::Container { children, .. }
            | ParsedNodeKind::Choice { children }
            | ParsedNodeKind::Case { children }
            | ParsedNodeKind::List { children, .. }
            | ParsedNodeKind::Grouping { children, .. }
            | ParsedNodeKind::InOut { children, .. }
            | ParsedNodeKind::Notification { children, .. } => children,
            _ => &[],
        }
    }
}

/// A node in the compiled schema tree.
///
/// Compiled nodes live in the per-context arena because the compiled tree is
/// cross-module: augments may graft nodes owned by one module under a parent
/// owned by another. Each node therefore records its owning module.
#[derive(Clone, Debug)]
pub struct CompiledNode {
    /// Node name.
    pub name: String,
    /// Owning module.
    pub module: ModuleId,
    /// Parent node, if any.
    pub parent: Option<CompiledNodeId>,
    /// Lifecycle status.
    pub status: Status,
    /// Type-specific payload.
    pub kind: CompiledNodeKind,
}

/// Type-specific payload of a compiled node.
#[derive(Clone, Debug)]
pub enum CompiledNodeKind {
    Container { children: Vec<CompiledNodeId> },
    Choice { children: Vec<CompiledNodeId> },
    Case { children: Vec<CompiledNodeId> },
    Leaf,
    LeafList,
    List { children: Vec<CompiledNodeId> },
    Anyxml,
    Anydata,
    Action {
        input: Option<CompiledNodeId>,
        output: Option<CompiledNodeId>,
    },
    InOut {
        children: Vec<CompiledNodeId>,
        /// True for the output half of an action.
        output: bool,
    },
    Notification { children: Vec<CompiledNodeId> },
}

impl CompiledNode {
    /// Create a node with no parent and default status.
    #[must_use]
    pub fn new(name: impl Into<String>, module: ModuleId, kind: CompiledNodeKind) -> Self {
        Self {
            name: name.into(),
            module,
            parent: None,
            status: Status::default(),
            kind,
        }
    }

    /// The node's type tag.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            CompiledNodeKind::Container { .. } => NodeType::Container,
            CompiledNodeKind::Choice { .. } => NodeType::Choice,
            CompiledNodeKind::Case { .. } => NodeType::Case,
            CompiledNodeKind::Leaf => NodeType::Leaf,
            CompiledNodeKind::LeafList => NodeType::LeafList,
            CompiledNodeKind::List { .. } => NodeType::List,
            CompiledNodeKind::Anyxml => NodeType::Anyxml,
            CompiledNodeKind::Anydata => NodeType::Anydata,
            CompiledNodeKind::Action { .. } => NodeType::Action,
            CompiledNodeKind::InOut { .. } => NodeType::InOut,
            CompiledNodeKind::Notification { .. } => NodeType::Notification,
        }
    }

    /// Direct children of this node.
    ///
    /// Empty for leaves and for actions, whose input/output halves are
    /// selected explicitly by the caller.
    #[must_use]
    pub fn children(&self) -> &[CompiledNodeId] {
        match &self.kind {
            CompiledNodeKind::Container { children }
            | CompiledNodeKind::Choice { children }
            | CompiledNodeKind::Case { children }
            | CompiledNodeKind::List { children }
            | CompiledNodeKind::InOut { children, .. }
            | CompiledNodeKind::Notification { children } => children,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_accessors_by_kind() {
        let container = ParsedNode::new(
            "c",
            ParsedNodeKind::Container {
                typedefs: vec![Typedef::new("t", "string")],
                children: Vec::new(),
            },
        );
        assert_eq!(container.node_type(), NodeType::Container);
        assert_eq!(container.typedefs().len(), 1);

        let leaf = ParsedNode::new(
            "l",
            ParsedNodeKind::Leaf {
                type_name: "int32".into(),
            },
        );
        assert_eq!(leaf.node_type(), NodeType::Leaf);
        assert!(leaf.typedefs().is_empty());
        assert!(leaf.children().is_empty());

        let choice = ParsedNode::new("ch", ParsedNodeKind::Choice { children: Vec::new() });
        assert!(choice.typedefs().is_empty());
    }

    #[test]
    fn test_compiled_action_children_empty() {
        let module = ModuleId::from_raw(1).unwrap();
        let action = CompiledNode::new(
            "do-it",
            module,
            CompiledNodeKind::Action {
                input: None,
                output: None,
            },
        );
        assert_eq!(action.node_type(), NodeType::Action);
        assert!(action.children().is_empty());
    }

    #[test]
    fn test_type_set_round_trip() {
        let all = [
            NodeType::Container,
            NodeType::Choice,
            NodeType::Case,
            NodeType::Leaf,
            NodeType::LeafList,
            NodeType::List,
            NodeType::Anyxml,
            NodeType::Anydata,
            NodeType::Grouping,
            NodeType::Action,
            NodeType::Notification,
            NodeType::InOut,
        ];
        for t in all {
            assert!(t.as_set().contains(t.as_set()));
            let others: Vec<_> = all.iter().filter(|&&o| o != t).collect();
            for o in others {
                assert!(!t.as_set().contains(o.as_set()));
            }
        }
    }
}
