//! Prefix-to-module resolution.
//!
//! A prefix is a module-local alias: either the module's own prefix or the
//! prefix of one of its imports. Both facets carry an import list; the two
//! resolvers share the algorithm and differ only in which list they scan.
//! A miss is not an error here; the caller decides what to report.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::schema::{Import, ModuleId};

/// Resolve a prefix against a module's parsed facet.
#[must_use]
pub fn resolve_prefix_parsed(ctx: &Context, module: ModuleId, prefix: &str) -> Option<ModuleId> {
    let m = ctx.module(module);
    if m.prefix == prefix {
        return Some(module);
    }
    m.parsed
        .as_ref()?
        .imports
        .iter()
        .find(|imp| imp.prefix == prefix)
        .and_then(|imp| imp.module)
}

/// Resolve a prefix against a module's compiled facet.
#[must_use]
pub fn resolve_prefix_compiled(ctx: &Context, module: ModuleId, prefix: &str) -> Option<ModuleId> {
    let m = ctx.module(module);
    if m.prefix == prefix {
        return Some(module);
    }
    m.compiled
        .as_ref()?
        .imports
        .iter()
        .find(|imp| imp.prefix == prefix)
        .map(|imp| imp.module)
}

/// Resolve a prefix against whichever facet the module has, preferring the
/// compiled one.
#[must_use]
pub fn resolve_prefix(ctx: &Context, module: ModuleId, prefix: &str) -> Option<ModuleId> {
    if ctx.module(module).compiled.is_some() {
        resolve_prefix_compiled(ctx, module, prefix)
    } else {
        resolve_prefix_parsed(ctx, module, prefix)
    }
}

/// Check a prefix about to be recorded against the prefixes already taken in
/// the unit: the module's own prefix and every import recorded so far.
///
/// # Errors
///
/// [`Error::Reference`] naming the conflicting use.
pub fn check_import_prefix(
    module_prefix: Option<&str>,
    imports: &[Import],
    value: &str,
) -> Result<()> {
    if module_prefix == Some(value) {
        return Err(Error::Reference(format!(
            "prefix \"{value}\" already used as module prefix"
        )));
    }
    if let Some(imp) = imports.iter().find(|imp| imp.prefix == value) {
        return Err(Error::Reference(format!(
            "prefix \"{value}\" already used to import \"{}\" module",
            imp.name
        )));
    }
    Ok(())
}
