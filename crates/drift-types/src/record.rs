//! Scanned file records and relative-path normalization.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::fingerprint::Fingerprint;

/// A single regular file discovered while scanning a tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the scanned root, `/`-separated, no leading separator.
    pub relative_path: String,
    /// Fingerprint of the full byte content.
    pub fingerprint: Fingerprint,
    /// Absolute location, used to re-read the content during comparison.
    pub location: PathBuf,
    /// File size in bytes at scan time.
    pub size: u64,
}

impl FileRecord {
    /// Create a new record.
    pub fn new(
        relative_path: impl Into<String>,
        fingerprint: Fingerprint,
        location: impl Into<PathBuf>,
        size: u64,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            fingerprint,
            location: location.into(),
            size,
        }
    }

    /// Lower-cased extension of the relative path, without the dot.
    ///
    /// Dotfiles such as `.gitignore` have no extension.
    pub fn extension(&self) -> Option<String> {
        let name = self.relative_path.rsplit('/').next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Normalize `path` relative to `root`.
///
/// Strips the root prefix, drops leading separators and `.` components, and
/// joins the remaining components with `/`. Returns `Ok(None)` when `path` is
/// not beneath `root` or names the root itself.
///
/// A component that is not valid UTF-8 is an error: a lossy conversion could
/// map two distinct names to the same key.
pub fn normalize_relative_path(root: &Path, path: &Path) -> Result<Option<String>, TypeError> {
    let Ok(relative) = path.strip_prefix(root) else {
        return Ok(None);
    };
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| TypeError::NonUtf8Path {
                    path: path.to_path_buf(),
                })?;
                parts.push(part);
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return Ok(None),
        }
    }
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(path, Fingerprint::of_bytes(b""), "/tmp/x", 0)
    }

    #[test]
    fn normalizes_nested_path() {
        let root = Path::new("/data/old");
        let path = root.join("bin").join("app.dll");
        assert_eq!(
            normalize_relative_path(root, &path).unwrap().as_deref(),
            Some("bin/app.dll")
        );
    }

    #[test]
    fn root_itself_has_no_relative_path() {
        let root = Path::new("/data/old");
        assert_eq!(normalize_relative_path(root, root), Ok(None));
    }

    #[test]
    fn path_outside_root_is_rejected() {
        let root = Path::new("/data/old");
        assert_eq!(normalize_relative_path(root, Path::new("/data/new/a.txt")), Ok(None));
    }

    #[test]
    fn curdir_components_are_dropped() {
        let root = Path::new("tree");
        let path = Path::new("tree/./sub/a.txt");
        assert_eq!(normalize_relative_path(root, path).unwrap().as_deref(), Some("sub/a.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_component_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/data/old");
        let path = root.join(OsStr::from_bytes(b"a\xff.txt"));
        assert_eq!(
            normalize_relative_path(root, &path),
            Err(TypeError::NonUtf8Path { path: path.clone() })
        );
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(record("bin/App.DLL").extension().as_deref(), Some("dll"));
        assert_eq!(record("notes.tar.gz").extension().as_deref(), Some("gz"));
    }

    #[test]
    fn dotfiles_and_bare_names_have_no_extension() {
        assert_eq!(record(".gitignore").extension(), None);
        assert_eq!(record("dir.d/Makefile").extension(), None);
        assert_eq!(record("trailing.").extension(), None);
    }
}
