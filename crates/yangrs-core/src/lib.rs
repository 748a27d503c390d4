//! yangrs-core: YANG (RFC 7950) schema helper core
//!
//! This crate is the semantic machinery that binds a parsed YANG module to
//! its compiled form: lexical identifier/nodeid/date/keyword recognition,
//! prefix and type resolution, typedef collision validation, schema-nodeid
//! resolution, status auditing, and the module/submodule loading
//! orchestration with its cycle and revision-uniqueness guards.
//!
//! # Pipeline
//!
//! ```text
//! Schema text → Parser* → parsed facet ─┐
//!                                       ├─ Context (registry, arenas)
//! compiled facet ← Compiler* ───────────┘
//!       loader: callback / searchdirs          resolvers: prefix, type,
//!       acquisition, cycle guards              typedef, nodeid, status
//! ```
//!
//! Components marked `*` are external collaborators; the loader reaches them
//! through the [`loader::ModuleParser`] seam, and resolution entry points are
//! what they call back into. All state lives in an explicit [`Context`] —
//! nothing here is process-global, and all operations run to completion on
//! the calling thread.

pub mod context;
pub mod error;
pub mod lex;
pub mod loader;
pub mod resolver;
pub mod schema;

pub use context::{Context, ContextFlags, ImportCallback};
pub use error::{Error, Result};
