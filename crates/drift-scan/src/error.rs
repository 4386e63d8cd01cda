//! Error types for the scan crate.

use std::path::{Path, PathBuf};

/// Errors that can occur while scanning a tree.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The root is missing, is not a directory, or an entry beneath it could
    /// not be listed, stat'ed, or read.
    #[error("unreadable tree at {}: {reason}", path.display())]
    UnreadableTree { path: PathBuf, reason: String },

    /// A hashing worker panicked or was cancelled.
    #[error("scan worker failed: {0}")]
    Worker(String),
}

impl ScanError {
    /// Build an [`ScanError::UnreadableTree`] for `path`.
    pub fn unreadable(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::UnreadableTree {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias for scan results.
pub type ScanResult<T> = Result<T, ScanError>;
