//! Module and submodule definition types.

use std::path::PathBuf;

use super::ids::{CompiledNodeId, ModuleId, ParsedNodeId, SubmoduleId};
use super::node::ParsedNode;

/// Lifecycle status of a named definition.
///
/// The ordering is the reference rule: a definition must not reference a
/// definition with a greater status in the same module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

impl Status {
    /// Status name as it appears in schema text and diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Deprecated => "deprecated",
            Self::Obsolete => "obsolete",
        }
    }
}

/// How certain the context is that a registered module revision is the
/// newest one for its name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LatestRevision {
    /// Not the latest, or unknown.
    #[default]
    No,
    /// Newest among the revisions seen so far.
    Tentative,
    /// Confirmed latest: a revision-less load selected this module.
    Confirmed,
}

/// One revision-history entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    /// Revision date, `YYYY-MM-DD`.
    pub date: String,
    /// Revision description.
    pub description: Option<String>,
}

impl Revision {
    /// Create a revision entry.
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            description: None,
        }
    }
}

/// Sort a revision list so the newest date sits at index 0.
///
/// Dates in `YYYY-MM-DD` order lexicographically the same way they order
/// chronologically, so a single pass finds the newest and one swap finishes.
/// The rest of the list keeps its relative order; only index 0 is relied on
/// downstream.
pub fn sort_revisions(revs: &mut [Revision]) {
    let mut newest = 0;
    for i in 1..revs.len() {
        if revs[i].date > revs[newest].date {
            newest = i;
        }
    }
    if newest != 0 {
        revs.swap(0, newest);
    }
}

/// An import statement linking a prefix to another module.
#[derive(Clone, Debug)]
pub struct Import {
    /// Imported module name.
    pub name: String,
    /// Prefix the importing unit uses for the imported module.
    pub prefix: String,
    /// Requested revision, if pinned.
    pub revision: Option<String>,
    /// The imported module, linked by the loader.
    pub module: Option<ModuleId>,
}

impl Import {
    /// Create an unlinked import.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            revision: None,
            module: None,
        }
    }
}

/// An include statement linking a submodule into its module.
#[derive(Clone, Debug)]
pub struct Include {
    /// Included submodule name.
    pub name: String,
    /// Requested revision, if pinned.
    pub revision: Option<String>,
    /// The included submodule, linked by the loader.
    pub submodule: Option<SubmoduleId>,
}

impl Include {
    /// Create an unlinked include.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: None,
            submodule: None,
        }
    }
}

/// A named derived type.
#[derive(Clone, Debug)]
pub struct Typedef {
    /// Typedef name.
    pub name: String,
    /// The base type reference, possibly `prefix:name` qualified.
    pub base: String,
    /// Lifecycle status.
    pub status: Status,
    /// Units string.
    pub units: Option<String>,
    /// Default value text.
    pub default: Option<String>,
    /// Description text.
    pub description: Option<String>,
}

impl Typedef {
    /// Create a typedef with default status and no metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            status: Status::default(),
            units: None,
            default: None,
            description: None,
        }
    }
}

/// The parsed (statement-level) facet of a module or submodule.
#[derive(Debug, Default)]
pub struct ParsedModule {
    /// Import statements.
    pub imports: Vec<Import>,
    /// Include statements.
    pub includes: Vec<Include>,
    /// Top-level typedefs.
    pub typedefs: Vec<Typedef>,
    /// Arena of every parsed schema node declared in this unit.
    pub nodes: Vec<ParsedNode>,
    /// Top-level data nodes.
    pub data: Vec<ParsedNodeId>,
    /// Re-entry guard, set while this unit's statements are being parsed.
    pub parsing: bool,
}

impl ParsedModule {
    /// Get a node by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different unit.
    #[must_use]
    pub fn node(&self, id: ParsedNodeId) -> &ParsedNode {
        &self.nodes[id.to_index()]
    }

    /// Get a node by handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different unit.
    #[must_use]
    pub fn node_mut(&mut self, id: ParsedNodeId) -> &mut ParsedNode {
        &mut self.nodes[id.to_index()]
    }

    /// Add a node to the arena and return its handle.
    #[allow(clippy::missing_panics_doc)] // Panic only on arena overflow (>4B nodes).
    pub fn add_node(&mut self, node: ParsedNode) -> ParsedNodeId {
        self.nodes.push(node);
        ParsedNodeId::from_index(self.nodes.len() - 1).expect("parsed node arena overflow")
    }
}

/// A prefix binding in a compiled module.
#[derive(Clone, Debug)]
pub struct CompiledImport {
    /// Prefix used for the imported module.
    pub prefix: String,
    /// The imported module.
    pub module: ModuleId,
}

/// The compiled (resolved-graph) facet of a module.
#[derive(Debug, Default)]
pub struct CompiledModule {
    /// Prefix bindings.
    pub imports: Vec<CompiledImport>,
    /// Top-level data nodes, handles into the context node arena.
    pub data: Vec<CompiledNodeId>,
}

/// A named, optionally revision-dated schema unit.
///
/// Either facet may be absent: an import-only module may stay parsed-only,
/// and a module restored from elsewhere may be compiled-only.
#[derive(Debug)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Namespace URI.
    pub namespace: String,
    /// The module's own prefix.
    pub prefix: String,
    /// Revision history, newest first.
    pub revisions: Vec<Revision>,
    /// Path of the file the module was loaded from, kept as provenance for
    /// diagnostics.
    pub filepath: Option<PathBuf>,
    /// Whether this revision is active for data-tree validation.
    pub implemented: bool,
    /// Latest-revision bookkeeping.
    pub latest_revision: LatestRevision,
    /// Parsed facet.
    pub parsed: Option<ParsedModule>,
    /// Compiled facet.
    pub compiled: Option<CompiledModule>,
}

impl Module {
    /// Create an empty module with neither facet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            prefix: prefix.into(),
            revisions: Vec::new(),
            filepath: None,
            implemented: false,
            latest_revision: LatestRevision::default(),
            parsed: None,
            compiled: None,
        }
    }

    /// The newest revision date, if any revision is recorded.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revisions.first().map(|r| r.date.as_str())
    }
}

/// A schema fragment belonging to a module.
///
/// Same shape as a module's parsed facet, but carries `belongs_to` instead of
/// a namespace and prefix of its own. Submodules are never compiled
/// independently; their typedefs and data nodes are merged into the parent.
#[derive(Debug)]
pub struct Submodule {
    /// Submodule name.
    pub name: String,
    /// Name of the module this submodule belongs to.
    pub belongs_to: String,
    /// Revision history, newest first.
    pub revisions: Vec<Revision>,
    /// Path of the file the submodule was loaded from.
    pub filepath: Option<PathBuf>,
    /// Latest-revision bookkeeping.
    pub latest_revision: LatestRevision,
    /// Parsed statements.
    pub parsed: ParsedModule,
}

impl Submodule {
    /// Create an empty submodule.
    #[must_use]
    pub fn new(name: impl Into<String>, belongs_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            belongs_to: belongs_to.into(),
            revisions: Vec::new(),
            filepath: None,
            latest_revision: LatestRevision::default(),
            parsed: ParsedModule::default(),
        }
    }

    /// The newest revision date, if any revision is recorded.
    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revisions.first().map(|r| r.date.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_revisions_moves_newest_first() {
        let mut revs = vec![
            Revision::new("2017-05-01"),
            Revision::new("2019-11-20"),
            Revision::new("2018-01-01"),
        ];
        sort_revisions(&mut revs);
        assert_eq!(revs[0].date, "2019-11-20");
    }

    #[test]
    fn test_sort_revisions_already_sorted() {
        let mut revs = vec![Revision::new("2020-01-01"), Revision::new("2010-01-01")];
        sort_revisions(&mut revs);
        assert_eq!(revs[0].date, "2020-01-01");
        assert_eq!(revs[1].date, "2010-01-01");
    }

    #[test]
    fn test_sort_revisions_empty_and_single() {
        let mut revs: Vec<Revision> = Vec::new();
        sort_revisions(&mut revs);

        let mut revs = vec![Revision::new("2020-06-15")];
        sort_revisions(&mut revs);
        assert_eq!(revs[0].date, "2020-06-15");
    }

    #[test]
    fn test_sort_revisions_index_zero_is_max() {
        let dates = ["2001-01-01", "2030-12-31", "2015-07-07", "2030-12-30"];
        let mut revs: Vec<Revision> = dates.iter().map(|d| Revision::new(*d)).collect();
        sort_revisions(&mut revs);
        let max = dates.iter().max().unwrap();
        assert_eq!(&revs[0].date, max);
    }

    #[test]
    fn test_module_revision_accessor() {
        let mut module = Module::new("m", "urn:m", "m");
        assert_eq!(module.revision(), None);
        module.revisions.push(Revision::new("2021-03-03"));
        assert_eq!(module.revision(), Some("2021-03-03"));
    }

    #[test]
    fn test_status_ordering() {
        assert!(Status::Current < Status::Deprecated);
        assert!(Status::Deprecated < Status::Obsolete);
        assert_eq!(Status::default(), Status::Current);
    }
}
