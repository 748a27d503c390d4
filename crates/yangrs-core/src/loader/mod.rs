//! Module and submodule loading.
//!
//! The loader turns a `(name, revision?)` reference into a registered module
//! or submodule: registry lookup first, then acquisition from the import
//! callback or the search directories (in the order the context flags
//! dictate), a post-parse check of what actually arrived, and the cycle and
//! implemented-revision guards.
//!
//! The textual parser and the semantic compiler stay outside this crate; the
//! loader reaches them through the [`ModuleParser`] seam.

mod search;

pub use search::search_localfile;

use std::fs;
use std::path::Path;

use crate::context::{Context, ContextFlags};
use crate::error::{Error, Result};
use crate::schema::{LatestRevision, ModuleId, SubmoduleId};

/// Input format of schema text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YANG textual syntax.
    Yang,
    /// YIN, the XML serialization of YANG.
    Yin,
}

impl SchemaFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yang => "yang",
            Self::Yin => "yin",
        }
    }

    /// Map a file extension to a format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yang" => Some(Self::Yang),
            "yin" => Some(Self::Yin),
            _ => None,
        }
    }
}

/// Seam to the textual parser and the semantic compiler.
///
/// `parse_module`/`parse_submodule` parse schema text, register the fresh
/// unit in the context, and return its handle. Implementations must register
/// the unit (with its `parsing` flag set) *before* processing its imports
/// and includes — recursion back into the loader relies on observing the
/// flag — and must remove any partially constructed unit from the context
/// before returning an error, so a failed load leaves no trace.
///
/// `compile_module` hands a parsed module to the compile pipeline; the
/// loader invokes it for modules loaded with `implement` set.
pub trait ModuleParser {
    /// Parse schema text into a registered module.
    fn parse_module(
        &self,
        ctx: &mut Context,
        data: &[u8],
        format: SchemaFormat,
    ) -> Result<ModuleId>;

    /// Parse schema text into a registered submodule of `belongs_to`.
    fn parse_submodule(
        &self,
        ctx: &mut Context,
        data: &[u8],
        format: SchemaFormat,
        belongs_to: &str,
    ) -> Result<SubmoduleId>;

    /// Compile a parsed module into its compiled facet.
    fn compile_module(&self, ctx: &mut Context, module: ModuleId) -> Result<()>;
}

/// Expectations checked against a freshly parsed unit.
#[derive(Debug, Default)]
pub struct LoadChecks<'a> {
    /// Expected unit name.
    pub name: Option<&'a str>,
    /// Expected newest revision.
    pub revision: Option<&'a str>,
    /// Source file path, checked for name/revision shape (warning only).
    pub path: Option<&'a Path>,
    /// For submodules, the name of the including module.
    pub submodule_of: Option<&'a str>,
}

/// Check a freshly parsed module against the loader's expectations.
///
/// # Errors
///
/// [`Error::InvalidInput`] when the parsed name or newest revision differs
/// from the expected one. A file name that does not match the
/// `name[@revision].ext` shape only logs a warning.
pub fn check_parsed_module(ctx: &Context, module: ModuleId, checks: &LoadChecks) -> Result<()> {
    let m = ctx.module(module);
    check_identity(&m.name, m.revision(), checks)?;
    if let Some(path) = checks.path {
        warn_filename_mismatch(&m.name, m.revision(), path);
    }
    Ok(())
}

/// Check a freshly parsed submodule against the loader's expectations.
///
/// # Errors
///
/// [`Error::InvalidInput`] on a name or revision mismatch,
/// [`Error::Reference`] when the submodule belongs to a different module
/// than the one including it, and [`Error::Cycle`] when the submodule is
/// already being parsed (an include cycle).
pub fn check_parsed_submodule(
    ctx: &Context,
    submodule: SubmoduleId,
    checks: &LoadChecks,
) -> Result<()> {
    let s = ctx.submodule(submodule);
    check_identity(&s.name, s.revision(), checks)?;

    if let Some(parent) = checks.submodule_of {
        if s.belongs_to != parent {
            return Err(Error::Reference(format!(
                "included \"{}\" submodule from \"{parent}\" belongs-to a different module \"{}\"",
                s.name, s.belongs_to
            )));
        }
        if s.parsed.parsing {
            return Err(Error::Cycle(format!(
                "a circular dependency (include) for module \"{}\"",
                s.name
            )));
        }
    }

    if let Some(path) = checks.path {
        warn_filename_mismatch(&s.name, s.revision(), path);
    }
    Ok(())
}

fn check_identity(name: &str, newest: Option<&str>, checks: &LoadChecks) -> Result<()> {
    if let Some(expected) = checks.name {
        if expected != name {
            return Err(Error::InvalidInput(format!(
                "unexpected module \"{name}\" parsed instead of \"{expected}\""
            )));
        }
    }
    if let Some(expected) = checks.revision {
        if newest != Some(expected) {
            return Err(Error::InvalidInput(format!(
                "module \"{name}\" parsed with the wrong revision (\"{}\" instead of \"{expected}\")",
                newest.unwrap_or("none")
            )));
        }
    }
    Ok(())
}

/// Warn when a file name does not match the unit it turned out to contain.
fn warn_filename_mismatch(name: &str, revision: Option<&str>, path: &Path) {
    let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
        return;
    };
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    let (base, file_rev) = match stem.split_once('@') {
        Some((base, rev)) => (base, Some(rev)),
        None => (stem, None),
    };
    if base != name {
        tracing::warn!("file name \"{filename}\" does not match module name \"{name}\"");
    }
    if let Some(file_rev) = file_rev {
        if revision != Some(file_rev) {
            tracing::warn!(
                "file name \"{filename}\" does not match module revision \"{}\"",
                revision.unwrap_or("none")
            );
        }
    }
}

/// Load a module by name and optional revision.
///
/// The context registry is consulted first: a requested revision must match
/// exactly, otherwise the latest registered revision is taken. A registry
/// miss (or a hit without the parsed facet when `require_parsed` is set)
/// acquires the module from the import callback or the search directories —
/// callback first unless the context prefers search directories — parses it,
/// and applies the post-parse check. With `implement` set the module is
/// marked implemented and handed to the compile pipeline; a compile failure
/// removes the module again.
///
/// # Errors
///
/// - [`Error::Denied`] when `implement` conflicts with an already
///   implemented revision of the same name.
/// - [`Error::Cycle`] when the registry hit is still being parsed (an import
///   cycle).
/// - [`Error::NotFound`] when both acquisition sources miss.
/// - Any error from the parser, the post-parse check, or the compiler.
pub fn load_module(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    name: &str,
    revision: Option<&str>,
    implement: bool,
    require_parsed: bool,
) -> Result<ModuleId> {
    let mut found = match revision {
        Some(rev) => ctx.get_module(name, rev),
        None => ctx.get_module_latest(name),
    };
    if let Some(id) = found {
        if require_parsed && ctx.module(id).parsed.is_none() {
            found = None;
        }
    }

    if let Some(id) = found {
        if implement {
            if let Some(other) = ctx.get_module_implemented(name) {
                if other != id {
                    return Err(Error::Denied(format!(
                        "module \"{name}\" is already present in other implemented revision"
                    )));
                }
            }
        }
        if ctx.module(id).parsed.as_ref().is_some_and(|p| p.parsing) {
            return Err(Error::Cycle(format!(
                "a circular dependency (import) for module \"{name}\""
            )));
        }
        if implement {
            ctx.set_implemented(id)?;
        }
        return Ok(id);
    }

    if implement && ctx.get_module_implemented(name).is_some() {
        return Err(Error::Denied(format!(
            "module \"{name}\" is already present in other implemented revision"
        )));
    }

    let prefer_dirs = ctx.flags().contains(ContextFlags::PREFER_SEARCHDIRS);
    let mut loaded = if prefer_dirs {
        module_from_localfile(ctx, parser, name, revision)?
    } else {
        module_from_callback(ctx, parser, name, revision)?
    };
    if loaded.is_none() {
        loaded = if prefer_dirs {
            module_from_callback(ctx, parser, name, revision)?
        } else {
            module_from_localfile(ctx, parser, name, revision)?
        };
    }
    let Some(id) = loaded else {
        return Err(Error::NotFound(format!(
            "module \"{name}{}\" not found",
            revision.map(|r| format!("@{r}")).unwrap_or_default()
        )));
    };

    // A revision-less load selected the latest available schema; even a
    // callback is assumed to hand out its latest.
    if revision.is_none() && ctx.module(id).latest_revision == LatestRevision::Tentative {
        ctx.module_mut(id).latest_revision = LatestRevision::Confirmed;
    }

    if implement {
        ctx.set_implemented(id)?;
        if let Err(err) = parser.compile_module(ctx, id) {
            ctx.remove_module(id);
            return Err(err);
        }
    }

    Ok(id)
}

/// Load a submodule on behalf of an include statement of `module`.
///
/// The submodule registry is consulted first; a hit that is still being
/// parsed is an include cycle. Acquisition mirrors [`load_module`], with the
/// callback receiving the including module's name.
///
/// # Errors
///
/// [`Error::Cycle`] on an include cycle, [`Error::NotFound`] when both
/// acquisition sources miss, plus any parser or post-parse check error.
pub fn load_submodule(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    module: ModuleId,
    name: &str,
    revision: Option<&str>,
) -> Result<SubmoduleId> {
    if let Some(id) = ctx.get_submodule(name, revision) {
        if ctx.submodule(id).parsed.parsing {
            return Err(Error::Cycle(format!(
                "a circular dependency (include) for module \"{name}\""
            )));
        }
        return Ok(id);
    }

    let parent = ctx.module(module).name.clone();

    let prefer_dirs = ctx.flags().contains(ContextFlags::PREFER_SEARCHDIRS);
    let mut loaded = if prefer_dirs {
        submodule_from_localfile(ctx, parser, &parent, name, revision)?
    } else {
        submodule_from_callback(ctx, parser, &parent, name, revision)?
    };
    if loaded.is_none() {
        loaded = if prefer_dirs {
            submodule_from_callback(ctx, parser, &parent, name, revision)?
        } else {
            submodule_from_localfile(ctx, parser, &parent, name, revision)?
        };
    }
    let Some(id) = loaded else {
        return Err(Error::NotFound(format!(
            "including \"{name}\" submodule into \"{parent}\" failed"
        )));
    };

    if revision.is_none() && ctx.submodule(id).latest_revision == LatestRevision::Tentative {
        ctx.submodule_mut(id).latest_revision = LatestRevision::Confirmed;
    }

    Ok(id)
}

fn module_from_callback(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<ModuleId>> {
    let Some(callback) = ctx.import_callback() else {
        return Ok(None);
    };
    let Some((format, data)) = callback(name, revision, None, None) else {
        return Ok(None);
    };

    let id = parser.parse_module(ctx, &data, format)?;
    let checks = LoadChecks {
        name: Some(name),
        revision,
        ..LoadChecks::default()
    };
    if let Err(err) = check_parsed_module(ctx, id, &checks) {
        ctx.remove_module(id);
        return Err(err);
    }
    Ok(Some(id))
}

fn module_from_localfile(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<ModuleId>> {
    let Some((path, format)) = localfile(ctx, name, revision)? else {
        return Ok(None);
    };
    let data = fs::read(&path)?;

    let id = parser.parse_module(ctx, &data, format)?;
    let checks = LoadChecks {
        name: Some(name),
        revision,
        path: Some(&path),
        ..LoadChecks::default()
    };
    if let Err(err) = check_parsed_module(ctx, id, &checks) {
        ctx.remove_module(id);
        return Err(err);
    }
    ctx.record_module_path(id, &path);
    Ok(Some(id))
}

fn submodule_from_callback(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    parent: &str,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<SubmoduleId>> {
    let Some(callback) = ctx.import_callback() else {
        return Ok(None);
    };
    let Some((format, data)) = callback(parent, None, Some(name), revision) else {
        return Ok(None);
    };

    let id = parser.parse_submodule(ctx, &data, format, parent)?;
    let checks = LoadChecks {
        name: Some(name),
        revision,
        submodule_of: Some(parent),
        ..LoadChecks::default()
    };
    if let Err(err) = check_parsed_submodule(ctx, id, &checks) {
        ctx.remove_submodule(id);
        return Err(err);
    }
    Ok(Some(id))
}

fn submodule_from_localfile(
    ctx: &mut Context,
    parser: &dyn ModuleParser,
    parent: &str,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<SubmoduleId>> {
    let Some((path, format)) = localfile(ctx, name, revision)? else {
        return Ok(None);
    };
    let data = fs::read(&path)?;

    let id = parser.parse_submodule(ctx, &data, format, parent)?;
    let checks = LoadChecks {
        name: Some(name),
        revision,
        path: Some(&path),
        submodule_of: Some(parent),
    };
    if let Err(err) = check_parsed_submodule(ctx, id, &checks) {
        ctx.remove_submodule(id);
        return Err(err);
    }
    ctx.record_submodule_path(id, &path);
    Ok(Some(id))
}

fn localfile(
    ctx: &Context,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<(std::path::PathBuf, SchemaFormat)>> {
    if ctx.flags().contains(ContextFlags::DISABLE_SEARCHDIRS) {
        return Ok(None);
    }
    let include_cwd = !ctx.flags().contains(ContextFlags::DISABLE_SEARCHDIR_CWD);
    let found = search_localfile(ctx.searchdirs(), include_cwd, name, revision)?;
    if let Some((path, _)) = &found {
        tracing::debug!("loading schema from \"{}\" file", path.display());
    }
    Ok(found)
}
