use async_trait::async_trait;

use drift_types::FileRecord;

use crate::comparator::{Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
use crate::error::CompareResult;

/// Trusts the fingerprints: different hashes mean different files.
///
/// Pairs only reach a comparator after the classifier has seen their
/// fingerprints differ, so this never touches the filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FingerprintComparator;

#[async_trait]
impl Comparator for FingerprintComparator {
    fn name(&self) -> &str {
        "fingerprint"
    }

    async fn compare(
        &self,
        old: &FileRecord,
        new: &FileRecord,
        _options: &CompareOptions,
    ) -> CompareResult<CompareOutcome> {
        let verdict = if old.fingerprint == new.fingerprint {
            ComparisonVerdict::equal()
        } else {
            ComparisonVerdict::different()
        };
        Ok(CompareOutcome::new(verdict))
    }
}
