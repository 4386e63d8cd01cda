//! Report assembly and rendering for drift.
//!
//! The comparison pipeline feeds paths, diffs, and warnings into a
//! [`ReportBuilder`], which is consumed once at the end of a run to produce
//! an immutable [`Report`]. Sections are kept in sorted collections so the
//! rendered output never depends on the order comparisons finished in.
//!
//! # Key Types
//!
//! - [`ReportBuilder`] -- Accumulates results during a run
//! - [`Report`] / [`ModifiedEntry`] / [`Summary`] -- The finished report
//! - [`ReportFormat`] -- Markdown or JSON rendering

pub mod builder;
pub mod error;
pub mod markdown;
pub mod report;

pub use builder::ReportBuilder;
pub use error::{ReportError, ReportResult};
pub use markdown::render_markdown;
pub use report::{ModifiedEntry, Report, ReportFormat, Summary};
