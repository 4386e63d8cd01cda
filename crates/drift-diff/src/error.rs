//! Error types for the diff crate.

/// Errors that can occur during diff operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// One side has more lines than the renderer is allowed to table.
    #[error("diff input too large: {old_lines} x {new_lines} lines exceeds limit of {limit} per side")]
    InputTooLarge {
        old_lines: usize,
        new_lines: usize,
        limit: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
