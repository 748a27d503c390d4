//! Per-context mutable state.
//!
//! A [`Context`] owns everything that makes a set of modules a coherent
//! schema: the module and submodule registries, the compiled node arena, the
//! search directories, and the user-supplied import callback. Nothing here is
//! process-global; callers wanting parallelism arrange one context per
//! thread.
//!
//! Registries hand out stable [`ModuleId`]/[`SubmoduleId`] handles backed by
//! tombstoned slots: removing a module never shifts or invalidates the
//! handles of its neighbors.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::loader::SchemaFormat;
use crate::schema::{
    CompiledNode, CompiledNodeId, CompiledNodeKind, LatestRevision, Module, ModuleId, Submodule,
    SubmoduleId,
};

bitflags! {
    /// Context behavior flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ContextFlags: u8 {
        /// Try the search directories before the import callback.
        const PREFER_SEARCHDIRS = 0x01;
        /// Never consult the search directories.
        const DISABLE_SEARCHDIRS = 0x02;
        /// Do not implicitly search the current working directory.
        const DISABLE_SEARCHDIR_CWD = 0x04;
    }
}

/// User-supplied schema acquisition callback.
///
/// Called with `(module_name, module_revision, submodule_name,
/// submodule_revision)`; for a submodule request the first two arguments
/// carry the including module. Returns the schema text and its format, or
/// `None` when the callback cannot supply the unit. The returned buffer is
/// owned, so no deallocation protocol is needed.
pub type ImportCallback =
    Rc<dyn Fn(&str, Option<&str>, Option<&str>, Option<&str>) -> Option<(SchemaFormat, Vec<u8>)>>;

/// A schema context: module registry, compiled node arena, and acquisition
/// configuration.
#[derive(Default)]
pub struct Context {
    /// Module registry. Slots are tombstoned on removal so handles stay
    /// stable.
    modules: Vec<Option<Module>>,
    /// Submodule registry.
    submodules: Vec<Option<Submodule>>,
    /// Arena of compiled schema nodes, shared by every module in the
    /// context. Append-only; nodes of a removed module become unreachable.
    nodes: Vec<CompiledNode>,
    /// Directories searched for `name[@revision].{yang,yin}` files.
    searchdirs: Vec<PathBuf>,
    /// Behavior flags.
    flags: ContextFlags,
    /// User-supplied acquisition callback.
    import_callback: Option<ImportCallback>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current behavior flags.
    #[must_use]
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    /// Replace the behavior flags.
    pub fn set_flags(&mut self, flags: ContextFlags) {
        self.flags = flags;
    }

    /// Append a search directory.
    pub fn add_searchdir(&mut self, dir: impl Into<PathBuf>) {
        self.searchdirs.push(dir.into());
    }

    /// The configured search directories, in priority order.
    #[must_use]
    pub fn searchdirs(&self) -> &[PathBuf] {
        &self.searchdirs
    }

    /// Install the import callback.
    pub fn set_import_callback(&mut self, callback: ImportCallback) {
        self.import_callback = Some(callback);
    }

    /// The installed import callback, if any.
    #[must_use]
    pub fn import_callback(&self) -> Option<ImportCallback> {
        self.import_callback.clone()
    }

    // ------------------------------------------------------------------
    // Module registry
    // ------------------------------------------------------------------

    /// Register a module and return its handle.
    ///
    /// Performs latest-revision bookkeeping: when the new module's newest
    /// revision is strictly newer than every same-name module already
    /// registered (or it is the only one), it becomes the tentative latest
    /// and any previous holder is demoted.
    #[allow(clippy::missing_panics_doc)] // Panic only on registry overflow (>4B modules).
    pub fn insert_module(&mut self, mut module: Module) -> ModuleId {
        let is_latest = self
            .modules_by_name(&module.name)
            .all(|(_, existing)| existing.revision() < module.revision());
        if is_latest {
            let demote: Vec<ModuleId> = self
                .modules_by_name(&module.name)
                .filter(|(_, m)| m.latest_revision != LatestRevision::No)
                .map(|(id, _)| id)
                .collect();
            for id in demote {
                self.module_mut(id).latest_revision = LatestRevision::No;
            }
            module.latest_revision = LatestRevision::Tentative;
        }

        self.modules.push(Some(module));
        ModuleId::from_index(self.modules.len() - 1).expect("module registry overflow")
    }

    /// Remove a module, tombstoning its slot.
    ///
    /// Compiled nodes owned by the module stay in the arena but become
    /// unreachable; the context's lifetime bounds that garbage.
    pub fn remove_module(&mut self, id: ModuleId) -> Option<Module> {
        self.modules.get_mut(id.to_index()).and_then(Option::take)
    }

    /// Get a module by handle.
    ///
    /// # Panics
    ///
    /// Panics if the module was removed; a stale handle is a caller bug.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> &Module {
        self.modules[id.to_index()]
            .as_ref()
            .expect("stale module handle")
    }

    /// Get a module by handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the module was removed.
    #[must_use]
    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        self.modules[id.to_index()]
            .as_mut()
            .expect("stale module handle")
    }

    /// Iterate all live modules.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().enumerate().filter_map(|(i, slot)| {
            let module = slot.as_ref()?;
            Some((ModuleId::from_index(i)?, module))
        })
    }

    fn modules_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (ModuleId, &'a Module)> + 'a {
        self.modules().filter(move |(_, m)| m.name == name)
    }

    /// Find the module with the given name and newest revision date.
    #[must_use]
    pub fn get_module(&self, name: &str, revision: &str) -> Option<ModuleId> {
        self.modules_by_name(name)
            .find(|(_, m)| m.revision() == Some(revision))
            .map(|(id, _)| id)
    }

    /// Find the latest revision of a module name.
    ///
    /// Prefers the confirmed latest, then the tentative latest, then falls
    /// back to the greatest newest-revision date among registered modules of
    /// that name.
    #[must_use]
    pub fn get_module_latest(&self, name: &str) -> Option<ModuleId> {
        let mut fallback: Option<(ModuleId, Option<&str>)> = None;
        let mut tentative = None;
        for (id, m) in self.modules_by_name(name) {
            match m.latest_revision {
                LatestRevision::Confirmed => return Some(id),
                LatestRevision::Tentative => tentative = Some(id),
                LatestRevision::No => {}
            }
            if fallback.is_none() || m.revision() > fallback.and_then(|(_, r)| r) {
                fallback = Some((id, m.revision()));
            }
        }
        tentative.or(fallback.map(|(id, _)| id))
    }

    /// Find the implemented revision of a module name, if any.
    #[must_use]
    pub fn get_module_implemented(&self, name: &str) -> Option<ModuleId> {
        self.modules_by_name(name)
            .find(|(_, m)| m.implemented)
            .map(|(id, _)| id)
    }

    /// Mark a module implemented.
    ///
    /// # Errors
    ///
    /// [`Error::Denied`] if a different revision of the same name is already
    /// implemented; at most one revision per name may be implemented in a
    /// context.
    pub fn set_implemented(&mut self, id: ModuleId) -> Result<()> {
        let name = &self.module(id).name;
        if let Some(other) = self.get_module_implemented(name) {
            if other != id {
                return Err(Error::Denied(format!(
                    "module \"{name}\" is already present in other implemented revision"
                )));
            }
            return Ok(());
        }
        self.module_mut(id).implemented = true;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submodule registry
    // ------------------------------------------------------------------

    /// Register a submodule and return its handle.
    #[allow(clippy::missing_panics_doc)] // Panic only on registry overflow.
    pub fn insert_submodule(&mut self, mut submodule: Submodule) -> SubmoduleId {
        let is_latest = self
            .submodules_by_name(&submodule.name)
            .all(|(_, existing)| existing.revision() < submodule.revision());
        if is_latest {
            let demote: Vec<SubmoduleId> = self
                .submodules_by_name(&submodule.name)
                .filter(|(_, s)| s.latest_revision != LatestRevision::No)
                .map(|(id, _)| id)
                .collect();
            for id in demote {
                self.submodule_mut(id).latest_revision = LatestRevision::No;
            }
            submodule.latest_revision = LatestRevision::Tentative;
        }

        self.submodules.push(Some(submodule));
        SubmoduleId::from_index(self.submodules.len() - 1).expect("submodule registry overflow")
    }

    /// Remove a submodule, tombstoning its slot.
    pub fn remove_submodule(&mut self, id: SubmoduleId) -> Option<Submodule> {
        self.submodules.get_mut(id.to_index()).and_then(Option::take)
    }

    /// Get a submodule by handle.
    ///
    /// # Panics
    ///
    /// Panics if the submodule was removed.
    #[must_use]
    pub fn submodule(&self, id: SubmoduleId) -> &Submodule {
        self.submodules[id.to_index()]
            .as_ref()
            .expect("stale submodule handle")
    }

    /// Get a submodule by handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the submodule was removed.
    #[must_use]
    pub fn submodule_mut(&mut self, id: SubmoduleId) -> &mut Submodule {
        self.submodules[id.to_index()]
            .as_mut()
            .expect("stale submodule handle")
    }

    fn submodules_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (SubmoduleId, &'a Submodule)> + 'a {
        self.submodules.iter().enumerate().filter_map(move |(i, slot)| {
            let sub = slot.as_ref()?;
            if sub.name != name {
                return None;
            }
            Some((SubmoduleId::from_index(i)?, sub))
        })
    }

    /// Find a registered submodule: the exact revision when one is
    /// requested, otherwise the latest.
    #[must_use]
    pub fn get_submodule(&self, name: &str, revision: Option<&str>) -> Option<SubmoduleId> {
        match revision {
            Some(rev) => self
                .submodules_by_name(name)
                .find(|(_, s)| s.revision() == Some(rev))
                .map(|(id, _)| id),
            None => {
                let mut best: Option<(SubmoduleId, &Submodule)> = None;
                for (id, s) in self.submodules_by_name(name) {
                    match s.latest_revision {
                        LatestRevision::Confirmed => return Some(id),
                        LatestRevision::Tentative => return Some(id),
                        LatestRevision::No => {}
                    }
                    if best.is_none() || s.revision() > best.map(|(_, b)| b).and_then(Submodule::revision) {
                        best = Some((id, s));
                    }
                }
                best.map(|(id, _)| id)
            }
        }
    }

    // ------------------------------------------------------------------
    // Compiled node arena
    // ------------------------------------------------------------------

    /// Add a compiled node to the arena and return its handle.
    #[allow(clippy::missing_panics_doc)] // Panic only on arena overflow.
    pub fn add_node(&mut self, node: CompiledNode) -> CompiledNodeId {
        self.nodes.push(node);
        CompiledNodeId::from_index(self.nodes.len() - 1).expect("compiled node arena overflow")
    }

    /// Get a compiled node by handle.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range handle.
    #[must_use]
    pub fn node(&self, id: CompiledNodeId) -> &CompiledNode {
        &self.nodes[id.to_index()]
    }

    /// Get a compiled node by handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range handle.
    #[must_use]
    pub fn node_mut(&mut self, id: CompiledNodeId) -> &mut CompiledNode {
        &mut self.nodes[id.to_index()]
    }

    /// Children of a compiled node for tree traversal.
    ///
    /// For an action the input child set is returned by default and the
    /// output set when `output` is true; every other kind ignores `output`.
    #[must_use]
    pub fn node_children(&self, id: CompiledNodeId, output: bool) -> &[CompiledNodeId] {
        let node = self.node(id);
        match &node.kind {
            CompiledNodeKind::Action { input, output: out } => {
                let inout = if output { *out } else { *input };
                inout.map_or(&[] as &[CompiledNodeId], |i| self.node(i).children())
            }
            _ => node.children(),
        }
    }

    /// Record the path a module was loaded from, unless already known.
    pub fn record_module_path(&mut self, id: ModuleId, path: &Path) {
        let module = self.module_mut(id);
        if module.filepath.is_none() {
            module.filepath = Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        }
    }

    /// Record the path a submodule was loaded from, unless already known.
    pub fn record_submodule_path(&mut self, id: SubmoduleId, path: &Path) {
        let sub = self.submodule_mut(id);
        if sub.filepath.is_none() {
            sub.filepath = Some(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
        }
    }
}
