//! Edit script lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a [`DiffLine`] does to the old sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    /// Present in both sequences.
    Context,
    /// Present only in the new sequence.
    Insert,
    /// Present only in the old sequence.
    Delete,
}

impl DiffOp {
    /// Single-character prefix used in rendered diffs.
    pub fn prefix(self) -> char {
        match self {
            Self::Context => ' ',
            Self::Insert => '+',
            Self::Delete => '-',
        }
    }
}

/// One line of an edit script. `text` carries no line terminator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffLine {
    pub op: DiffOp,
    pub text: String,
}

impl DiffLine {
    pub fn context(text: impl Into<String>) -> Self {
        Self { op: DiffOp::Context, text: text.into() }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self { op: DiffOp::Insert, text: text.into() }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self { op: DiffOp::Delete, text: text.into() }
    }

    /// Returns `true` if the line belongs to the old sequence.
    pub fn in_old(&self) -> bool {
        matches!(self.op, DiffOp::Context | DiffOp::Delete)
    }

    /// Returns `true` if the line belongs to the new sequence.
    pub fn in_new(&self) -> bool {
        matches!(self.op, DiffOp::Context | DiffOp::Insert)
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.prefix(), self.text)
    }
}
