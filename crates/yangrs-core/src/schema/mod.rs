//! The schema data model: modules, submodules, nodes, and built-in types.

mod ids;
mod module;
mod node;
mod types;

pub use ids::{CompiledNodeId, ModuleId, ParsedNodeId, SubmoduleId};
pub use module::{
    sort_revisions, CompiledImport, CompiledModule, Import, Include, LatestRevision, Module,
    ParsedModule, Revision, Status, Submodule, Typedef,
};
pub use node::{CompiledNode, CompiledNodeKind, NodeType, NodeTypeSet, ParsedNode, ParsedNodeKind};
pub use types::BuiltinType;
