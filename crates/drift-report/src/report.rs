//! The finished comparison report.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use drift_diff::DiffLine;
use drift_types::Warning;

use crate::error::{ReportError, ReportResult};
use crate::markdown::render_markdown;

/// Output rendering of a [`Report`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// A modified path, with its line diff when one was rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiedEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<DiffLine>>,
}

/// Trailing counts of a report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
    /// Files scanned in the old tree.
    pub old_total: usize,
    /// Files scanned in the new tree.
    pub new_total: usize,
}

impl Summary {
    /// Returns `true` if nothing was added, removed, or modified.
    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.modified == 0
    }
}

/// The result of comparing two trees.
///
/// Every path list is sorted lexicographically. `unchanged` is `None` unless
/// unchanged entries were requested; its count is always in the summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub old_root: PathBuf,
    pub new_root: PathBuf,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unchanged: Option<Vec<String>>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<ModifiedEntry>,
    pub warnings: Vec<Warning>,
    pub summary: Summary,
}

impl Report {
    /// Look up a modified entry by path.
    pub fn modified_entry(&self, path: &str) -> Option<&ModifiedEntry> {
        self.modified
            .binary_search_by(|entry| entry.path.as_str().cmp(path))
            .ok()
            .map(|idx| &self.modified[idx])
    }

    /// Paths of all modified entries, in order.
    pub fn modified_paths(&self) -> impl Iterator<Item = &str> {
        self.modified.iter().map(|entry| entry.path.as_str())
    }

    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render in the given format.
    pub fn render(&self, format: ReportFormat) -> ReportResult<String> {
        match format {
            ReportFormat::Markdown => Ok(render_markdown(self)),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Render and write to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> ReportResult<()> {
        let rendered = self.render(format)?;
        std::fs::write(path, rendered).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), %format, "report written");
        Ok(())
    }
}
