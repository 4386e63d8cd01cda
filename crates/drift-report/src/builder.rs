//! Incremental report assembly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::Utc;

use drift_diff::{ClassificationResult, DiffLine};
use drift_types::Warning;

use crate::report::{ModifiedEntry, Report, Summary};

/// Collects the outcome of a run and produces a [`Report`].
///
/// Paths may be added in any order and more than once; each section is a
/// sorted set. Adding a path to `modified` twice keeps the last diff seen.
#[derive(Clone, Debug, Default)]
pub struct ReportBuilder {
    old_root: PathBuf,
    new_root: PathBuf,
    added: BTreeSet<String>,
    removed: BTreeSet<String>,
    unchanged: BTreeSet<String>,
    modified: BTreeMap<String, Option<Vec<DiffLine>>>,
    warnings: Vec<Warning>,
    old_total: usize,
    new_total: usize,
}

impl ReportBuilder {
    pub fn new(old_root: impl Into<PathBuf>, new_root: impl Into<PathBuf>) -> Self {
        Self {
            old_root: old_root.into(),
            new_root: new_root.into(),
            ..Default::default()
        }
    }

    pub fn add_added(&mut self, path: impl Into<String>) {
        self.added.insert(path.into());
    }

    pub fn add_removed(&mut self, path: impl Into<String>) {
        self.removed.insert(path.into());
    }

    pub fn add_unchanged(&mut self, path: impl Into<String>) {
        self.unchanged.insert(path.into());
    }

    pub fn add_modified(&mut self, path: impl Into<String>, diff: Option<Vec<DiffLine>>) {
        self.modified.insert(path.into(), diff);
    }

    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = Warning>) {
        self.warnings.extend(warnings);
    }

    /// Record the number of files scanned in each tree.
    pub fn set_totals(&mut self, old_total: usize, new_total: usize) {
        self.old_total = old_total;
        self.new_total = new_total;
    }

    /// Add every path of a finished classification. Modified paths take
    /// their diff from `diffs` when present.
    pub fn record_classification(
        &mut self,
        result: &ClassificationResult,
        diffs: &mut BTreeMap<String, Vec<DiffLine>>,
    ) {
        for path in &result.added {
            self.add_added(path.clone());
        }
        for path in &result.removed {
            self.add_removed(path.clone());
        }
        for path in &result.unchanged {
            self.add_unchanged(path.clone());
        }
        for path in &result.modified {
            self.add_modified(path.clone(), diffs.remove(path));
        }
    }

    /// Finish the report. Unchanged paths are listed only when
    /// `include_unchanged` is set; they are always counted.
    pub fn build(self, include_unchanged: bool) -> Report {
        let mut warnings = self.warnings;
        warnings.sort();
        warnings.dedup();

        let summary = Summary {
            added: self.added.len(),
            removed: self.removed.len(),
            modified: self.modified.len(),
            unchanged: self.unchanged.len(),
            old_total: self.old_total,
            new_total: self.new_total,
        };

        Report {
            old_root: self.old_root,
            new_root: self.new_root,
            generated_at: Utc::now(),
            unchanged: include_unchanged.then(|| self.unchanged.into_iter().collect()),
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            modified: self
                .modified
                .into_iter()
                .map(|(path, diff)| ModifiedEntry { path, diff })
                .collect(),
            warnings,
            summary,
        }
    }
}
