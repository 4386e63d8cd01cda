//! The fingerprint index of one scanned tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use drift_types::FileRecord;

/// Immutable mapping from relative path to [`FileRecord`] for one tree.
///
/// Keys are unique; a scan that produced the same relative path twice would
/// be a bug in the scanner, not a condition callers need to handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    root: PathBuf,
    files: BTreeMap<String, FileRecord>,
}

impl Snapshot {
    /// Build a snapshot from records.
    pub fn from_records(root: impl Into<PathBuf>, records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut files = BTreeMap::new();
        for record in records {
            let previous = files.insert(record.relative_path.clone(), record);
            debug_assert!(previous.is_none(), "duplicate relative path in snapshot");
        }
        Self {
            root: root.into(),
            files,
        }
    }

    /// The root directory this snapshot was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the tree had no regular files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a record by relative path.
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Returns `true` if `path` is present.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Relative paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Records in relative-path order.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    /// Sum of all file sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.files.values().map(|r| r.size).sum()
    }
}
