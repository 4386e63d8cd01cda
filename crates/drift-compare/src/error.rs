//! Error types for the compare crate.

use std::path::PathBuf;

/// Failures reported by a [`Disassembler`](crate::Disassembler).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisassemblyError {
    /// The disassembler executable is not installed or cannot be started.
    #[error("disassembler '{program}' is not available")]
    ToolUnavailable { program: String },

    /// The disassembler ran but refused this input (protected module,
    /// access denied, non-zero exit, or timeout).
    #[error("disassembly of {} refused: {reason}", path.display())]
    Refused { path: PathBuf, reason: String },
}

/// Errors a comparator can report for one file pair.
///
/// None of these are fatal to a run; the registry records them as warnings.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// The external disassembler is not installed.
    #[error("disassembler '{program}' is not available")]
    ToolUnavailable { program: String },

    /// The disassembler refused one or both sides of the pair.
    #[error("disassembly refused for {path}: {reason}")]
    DisassemblyRefused { path: String, reason: String },

    /// A file could not be read back after scanning.
    #[error("cannot read {path}: {source}")]
    ContentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A blocking comparison task failed.
    #[error("comparison task failed: {0}")]
    Task(String),
}

/// Convenience alias for comparator results.
pub type CompareResult<T> = Result<T, CompareError>;
