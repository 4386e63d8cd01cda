//! Diff engine for drift.
//!
//! Reconciles two snapshots into added / removed / unchanged / candidate
//! paths, and turns two line sequences into a minimal edit script using a
//! longest-common-subsequence table.
//!
//! # Key Types
//!
//! - [`Classification`] / [`Candidate`] -- Snapshot reconciliation before deep comparison
//! - [`ClassificationResult`] -- Final four-way partition of all paths
//! - [`LcsTable`] / [`DiffLine`] / [`DiffOp`] -- Line-level diff
//! - [`DiffStats`] -- Insertion/deletion counts of an edit script

pub mod classify;
pub mod error;
pub mod lcs;
pub mod line;
pub mod render;

pub use classify::{classify, Candidate, Classification, ClassificationResult};
pub use error::{DiffError, DiffResult};
pub use lcs::{diff_lines, diff_lines_bounded, LcsTable};
pub use line::{DiffLine, DiffOp};
pub use render::{render_fenced, DiffStats};
