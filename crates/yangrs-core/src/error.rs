//! Error kinds shared by every helper-core operation.

use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the schema helper core.
///
/// The kinds are disjoint: every failure maps to exactly one variant, so
/// callers branch on the variant and use the message for diagnostics only.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed identifier, nodeid separator, or revision date.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unresolved prefix, type, node, file, or module.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rule violation: wrong terminal node type, implemented-revision
    /// conflict, or a status reference violation.
    #[error("denied: {0}")]
    Denied(String),

    /// Duplicate typedef name, whether top-level, scoped, or against a
    /// built-in type.
    #[error("name collision: {0}")]
    Collision(String),

    /// Invalid cross-reference, such as a submodule belonging to a different
    /// module or an unknown prefix in a schema-nodeid.
    #[error("invalid reference: {0}")]
    Reference(String),

    /// Import or include cycle detected through the `parsing` guard.
    #[error("circular dependency: {0}")]
    Cycle(String),

    /// Filesystem failure while locating or reading a schema file.
    #[error("system error: {0}")]
    System(#[from] std::io::Error),

    /// Invariant breach; indicates a bug in the library.
    #[error("internal error: {0}")]
    Internal(String),
}
