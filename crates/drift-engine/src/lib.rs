//! High-level API for drift.
//!
//! [`Drift`] wires the scanner, classifier, comparator registry, and report
//! builder into a single `compare(old, new)` call. This is the entry point
//! for applications embedding drift.

pub mod config;
pub mod engine;
pub mod error;

pub use config::DriftConfig;
pub use engine::{Drift, RunOutcome};
pub use error::{EngineError, EngineResult};

// Re-export key types
pub use drift_compare::{CompareConfig, Disassembler, DisassemblerConfig, FileCategory};
pub use drift_diff::{ClassificationResult, DiffLine, DiffOp};
pub use drift_report::{Report, ReportFormat, Summary};
pub use drift_scan::ScanConfig;
pub use drift_types::{Warning, WarningKind};
