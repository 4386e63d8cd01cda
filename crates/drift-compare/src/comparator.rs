use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use drift_diff::{diff_lines_bounded, DiffLine};
use drift_types::{FileRecord, Warning, WarningKind};

use crate::error::{CompareError, CompareResult};

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Equality verdict for one file pair.
///
/// `diff` is only populated when the files differ, a detailed diff was
/// requested, and rendering succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    pub equal: bool,
    pub diff: Option<Vec<DiffLine>>,
}

impl ComparisonVerdict {
    pub fn equal() -> Self {
        Self { equal: true, diff: None }
    }

    pub fn different() -> Self {
        Self { equal: false, diff: None }
    }

    pub fn different_with_diff(diff: Vec<DiffLine>) -> Self {
        Self { equal: false, diff: Some(diff) }
    }
}

/// A verdict plus any non-fatal conditions met while reaching it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareOutcome {
    pub verdict: ComparisonVerdict,
    pub warnings: Vec<Warning>,
}

impl CompareOutcome {
    pub fn new(verdict: ComparisonVerdict) -> Self {
        Self {
            verdict,
            warnings: Vec::new(),
        }
    }

    /// "Different" with no diff, carrying the warnings that explain why.
    pub fn degraded(warnings: Vec<Warning>) -> Self {
        Self {
            verdict: ComparisonVerdict::different(),
            warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Comparator trait
// ---------------------------------------------------------------------------

/// Per-run options shared by every comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareOptions {
    /// Render a line diff when the files differ.
    pub detailed_diff: bool,
    /// Sides longer than this are reported without a diff.
    pub max_diff_lines: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            detailed_diff: false,
            max_diff_lines: 5_000,
        }
    }
}

/// Equality strategy for one file category.
///
/// `old` and `new` share a relative path and are known to have different
/// fingerprints. Errors are not fatal; the registry converts them into
/// warnings and a "different" verdict.
#[async_trait]
pub trait Comparator: Send + Sync {
    /// Short name used in logs (e.g., "text", "disassembly").
    fn name(&self) -> &str;

    /// Compare the two sides of a pair.
    async fn compare(
        &self,
        old: &FileRecord,
        new: &FileRecord,
        options: &CompareOptions,
    ) -> CompareResult<CompareOutcome>;
}

/// Build the outcome for two line sequences already known to differ.
///
/// The LCS table runs on the blocking pool. Oversized inputs keep the
/// "different" verdict and record a [`WarningKind::DiffOmitted`] warning.
pub(crate) async fn differing_lines(
    path: &str,
    old: Vec<String>,
    new: Vec<String>,
    options: &CompareOptions,
) -> CompareResult<CompareOutcome> {
    if !options.detailed_diff {
        return Ok(CompareOutcome::new(ComparisonVerdict::different()));
    }

    let limit = options.max_diff_lines;
    let rendered = tokio::task::spawn_blocking(move || diff_lines_bounded(&old, &new, limit))
        .await
        .map_err(|e| CompareError::Task(e.to_string()))?;

    match rendered {
        Ok(diff) => Ok(CompareOutcome::new(ComparisonVerdict::different_with_diff(diff))),
        Err(e) => {
            warn!(path, error = %e, "diff omitted");
            Ok(CompareOutcome::degraded(vec![Warning::for_path(
                WarningKind::DiffOmitted,
                path,
                e.to_string(),
            )]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_diff::DiffOp;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn no_diff_unless_requested() {
        let outcome = differing_lines("a.txt", lines(&["a"]), lines(&["b"]), &CompareOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome, CompareOutcome::new(ComparisonVerdict::different()));
    }

    #[tokio::test]
    async fn renders_diff_when_requested() {
        let options = CompareOptions { detailed_diff: true, max_diff_lines: 100 };
        let outcome = differing_lines("a.txt", lines(&["a", "b"]), lines(&["a", "c"]), &options)
            .await
            .unwrap();
        let diff = outcome.verdict.diff.unwrap();
        assert!(!outcome.verdict.equal);
        assert_eq!(diff.iter().filter(|l| l.op == DiffOp::Context).count(), 1);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn oversized_input_omits_diff_with_warning() {
        let options = CompareOptions { detailed_diff: true, max_diff_lines: 1 };
        let outcome = differing_lines("big.dll", lines(&["a", "b"]), lines(&["c"]), &options)
            .await
            .unwrap();
        assert_eq!(outcome.verdict, ComparisonVerdict::different());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, WarningKind::DiffOmitted);
        assert_eq!(outcome.warnings[0].paths, vec!["big.dll".to_string()]);
    }
}
