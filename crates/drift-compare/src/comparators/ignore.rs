use async_trait::async_trait;

use drift_types::FileRecord;

use crate::comparator::{Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
use crate::error::CompareResult;

/// Treats every pair as equal. Used for artifacts that are expected to
/// differ between builds and carry no signal (debug symbols, caches, logs).
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreComparator;

#[async_trait]
impl Comparator for IgnoreComparator {
    fn name(&self) -> &str {
        "ignore"
    }

    async fn compare(
        &self,
        _old: &FileRecord,
        _new: &FileRecord,
        _options: &CompareOptions,
    ) -> CompareResult<CompareOutcome> {
        Ok(CompareOutcome::new(ComparisonVerdict::equal()))
    }
}
