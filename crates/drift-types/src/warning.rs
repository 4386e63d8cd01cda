//! Non-fatal conditions recorded while comparing two trees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of degradation a [`Warning`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// The external disassembler is not installed.
    ToolUnavailable,
    /// The disassembler ran but refused (or timed out on) a specific file.
    DisassemblyRefused,
    /// A file vanished or became unreadable between scan and comparison.
    ContentRead,
    /// The files differ but the detailed diff was skipped.
    DiffOmitted,
    /// A comparison task failed internally (panicked or was cancelled).
    ComparisonFailed,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ToolUnavailable => "tool-unavailable",
            Self::DisassemblyRefused => "disassembly-refused",
            Self::ContentRead => "content-read",
            Self::DiffOmitted => "diff-omitted",
            Self::ComparisonFailed => "comparison-failed",
        };
        f.write_str(label)
    }
}

/// A warning collected alongside the comparison results.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Warning {
    /// The kind of condition.
    pub kind: WarningKind,
    /// Relative paths involved, if the condition is tied to specific files.
    pub paths: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// Create a warning that is not tied to any file.
    pub fn general(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            paths: Vec::new(),
            message: message.into(),
        }
    }

    /// Create a warning naming the offending file.
    pub fn for_path(kind: WarningKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            paths: vec![path.into()],
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if !self.paths.is_empty() {
            write!(f, " ({})", self.paths.join(", "))?;
        }
        Ok(())
    }
}
