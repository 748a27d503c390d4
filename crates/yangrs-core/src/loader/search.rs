//! Search-directory protocol.
//!
//! Schema files are named `name.ext` or `name@YYYY-MM-DD.ext` with `ext` one
//! of `yang`/`yin`. Directories are tried in priority order and the first
//! directory holding any eligible candidate wins; within a directory the
//! requested revision must match exactly, otherwise the lexicographically
//! largest revision is taken, falling back to the bare `name.ext`. At equal
//! revision a `.yang` file beats a `.yin` one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lex;
use crate::loader::SchemaFormat;

/// A candidate schema file found in one directory.
struct Candidate {
    revision: Option<String>,
    format: SchemaFormat,
    path: PathBuf,
}

impl Candidate {
    /// Whether this candidate beats `other` under the selection rules.
    fn beats(&self, other: &Candidate) -> bool {
        match (&self.revision, &other.revision) {
            (Some(a), Some(b)) if a != b => a > b,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            _ => self.format == SchemaFormat::Yang && other.format == SchemaFormat::Yin,
        }
    }
}

/// Locate a schema file for `(name, revision)` in the search directories.
///
/// The current working directory, when `include_cwd` is set, is searched
/// before the explicit directories. Unreadable directories are skipped
/// silently. Returns `None` when no directory holds an eligible file; the
/// loader treats that as a miss and may fall back to its other source.
///
/// # Errors
///
/// [`crate::Error::System`] on directory-entry read failures.
pub fn search_localfile(
    searchdirs: &[PathBuf],
    include_cwd: bool,
    name: &str,
    revision: Option<&str>,
) -> Result<Option<(PathBuf, SchemaFormat)>> {
    let cwd = PathBuf::from(".");
    let dirs = include_cwd
        .then_some(&cwd)
        .into_iter()
        .chain(searchdirs.iter());

    for dir in dirs {
        if let Some(found) = search_dir(dir, name, revision)? {
            return Ok(Some((found.path, found.format)));
        }
    }
    Ok(None)
}

fn search_dir(dir: &Path, name: &str, revision: Option<&str>) -> Result<Option<Candidate>> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(None);
    };

    let mut best: Option<Candidate> = None;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(candidate) = classify(&path, name) else {
            continue;
        };
        if let Some(requested) = revision {
            if candidate.revision.as_deref() != Some(requested) {
                continue;
            }
        }
        if best.as_ref().is_none_or(|b| candidate.beats(b)) {
            best = Some(candidate);
        }
    }
    Ok(best)
}

/// Parse a file name of the `name[@revision].{yang,yin}` shape; anything
/// else, including a malformed revision, is ignored.
fn classify(path: &Path, name: &str) -> Option<Candidate> {
    let filename = path.file_name()?.to_str()?;
    let (stem, ext) = filename.rsplit_once('.')?;
    let format = SchemaFormat::from_extension(ext)?;

    let revision = if stem == name {
        None
    } else {
        let rev = stem.strip_prefix(name)?.strip_prefix('@')?;
        lex::check_date(rev, "revision").ok()?;
        Some(rev.to_string())
    };

    Some(Candidate {
        revision,
        format,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    fn search(dir: &TempDir, name: &str, revision: Option<&str>) -> Option<(PathBuf, SchemaFormat)> {
        search_localfile(&[dir.path().to_path_buf()], false, name, revision).unwrap()
    }

    #[test]
    fn test_bare_name_found() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-a.yang");

        let (path, format) = search(&dir, "mod-a", None).unwrap();
        assert_eq!(path.file_name().unwrap(), "mod-a.yang");
        assert_eq!(format, SchemaFormat::Yang);
    }

    #[test]
    fn test_largest_revision_wins_without_request() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-a.yang");
        touch(&dir, "mod-a@2018-01-01.yang");
        touch(&dir, "mod-a@2020-06-30.yang");
        touch(&dir, "mod-a@2019-12-31.yang");

        let (path, _) = search(&dir, "mod-a", None).unwrap();
        assert_eq!(path.file_name().unwrap(), "mod-a@2020-06-30.yang");
    }

    #[test]
    fn test_exact_revision_only_when_requested() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-a@2018-01-01.yang");
        touch(&dir, "mod-a@2020-06-30.yang");

        let (path, _) = search(&dir, "mod-a", Some("2018-01-01")).unwrap();
        assert_eq!(path.file_name().unwrap(), "mod-a@2018-01-01.yang");

        assert!(search(&dir, "mod-a", Some("2017-01-01")).is_none());
    }

    #[test]
    fn test_yang_beats_yin_at_same_revision() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-a@2020-01-01.yin");
        touch(&dir, "mod-a@2020-01-01.yang");

        let (path, format) = search(&dir, "mod-a", None).unwrap();
        assert_eq!(path.file_name().unwrap(), "mod-a@2020-01-01.yang");
        assert_eq!(format, SchemaFormat::Yang);
    }

    #[test]
    fn test_yin_found_when_alone() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-a.yin");

        let (_, format) = search(&dir, "mod-a", None).unwrap();
        assert_eq!(format, SchemaFormat::Yin);
    }

    #[test]
    fn test_unrelated_files_ignored() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "mod-ab.yang");
        touch(&dir, "mod-a.txt");
        touch(&dir, "mod-a@20-01-01.yang");
        touch(&dir, "mod-a@2020-13-01.yang");

        assert!(search(&dir, "mod-a", None).is_none());
    }

    #[test]
    fn test_directory_priority_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(&first, "mod-a@2010-01-01.yang");
        touch(&second, "mod-a@2020-01-01.yang");

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let (path, _) = search_localfile(&dirs, false, "mod-a", None)
            .unwrap()
            .unwrap();
        // The first directory holding a candidate wins, even with an older
        // revision than a later directory.
        assert!(path.starts_with(first.path()));
    }

    #[test]
    fn test_missing_directory_skipped() {
        let dirs = vec![PathBuf::from("/nonexistent-for-sure"), PathBuf::new()];
        assert!(search_localfile(&dirs, false, "mod-a", None).unwrap().is_none());
    }
}
