//! Snapshot reconciliation.
//!
//! [`classify`] splits the union of two snapshots' paths into added,
//! removed, unchanged, and candidates. A path whose fingerprints match is
//! unchanged without further work; only candidates go on to deeper
//! comparison, after which [`Classification::resolve`] folds the verdicts
//! back into a four-way [`ClassificationResult`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use drift_scan::Snapshot;
use drift_types::FileRecord;

/// A path present in both snapshots whose fingerprints differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: String,
    pub old: FileRecord,
    pub new: FileRecord,
}

/// Result of reconciling two snapshots, before candidates are compared.
///
/// Every list is sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    /// In new, not in old.
    pub added: Vec<String>,
    /// In old, not in new.
    pub removed: Vec<String>,
    /// In both with equal fingerprints.
    pub unchanged: Vec<String>,
    /// In both with different fingerprints.
    pub candidates: Vec<Candidate>,
}

impl Classification {
    /// Fold candidate verdicts (`path → equal`) into the final partition.
    ///
    /// A candidate without a verdict counts as modified.
    pub fn resolve(self, verdicts: &BTreeMap<String, bool>) -> ClassificationResult {
        let mut result = ClassificationResult {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            modified: BTreeSet::new(),
            unchanged: self.unchanged.into_iter().collect(),
        };
        for candidate in self.candidates {
            if verdicts.get(&candidate.path).copied().unwrap_or(false) {
                result.unchanged.insert(candidate.path);
            } else {
                result.modified.insert(candidate.path);
            }
        }
        result
    }
}

/// Four disjoint sets partitioning the union of both snapshots' paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub unchanged: BTreeSet<String>,
}

impl ClassificationResult {
    /// Number of distinct paths across both trees.
    pub fn total_paths(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len() + self.unchanged.len()
    }

    /// Returns `true` if nothing was added, removed, or modified.
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Reconcile `old` against `new`.
pub fn classify(old: &Snapshot, new: &Snapshot) -> Classification {
    let mut classification = Classification::default();

    for record in new.records() {
        if !old.contains(&record.relative_path) {
            classification.added.push(record.relative_path.clone());
        }
    }

    for old_record in old.records() {
        match new.get(&old_record.relative_path) {
            None => classification.removed.push(old_record.relative_path.clone()),
            Some(new_record) if new_record.fingerprint == old_record.fingerprint => {
                classification.unchanged.push(old_record.relative_path.clone());
            }
            Some(new_record) => classification.candidates.push(Candidate {
                path: old_record.relative_path.clone(),
                old: old_record.clone(),
                new: new_record.clone(),
            }),
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_types::Fingerprint;
    use proptest::prelude::*;

    fn snapshot(root: &str, files: &[(&str, &str)]) -> Snapshot {
        Snapshot::from_records(
            root,
            files.iter().map(|(path, content)| {
                FileRecord::new(
                    *path,
                    Fingerprint::of_bytes(content.as_bytes()),
                    format!("{root}/{path}"),
                    content.len() as u64,
                )
            }),
        )
    }

    #[test]
    fn partitions_added_removed_unchanged_and_candidates() {
        let old = snapshot("/old", &[("a.txt", "hello"), ("gone.txt", "x"), ("same.md", "s")]);
        let new = snapshot("/new", &[("a.txt", "hello world"), ("b.bin", "\0"), ("same.md", "s")]);

        let c = classify(&old, &new);
        assert_eq!(c.added, vec!["b.bin"]);
        assert_eq!(c.removed, vec!["gone.txt"]);
        assert_eq!(c.unchanged, vec!["same.md"]);
        assert_eq!(c.candidates.len(), 1);

        let candidate = &c.candidates[0];
        assert_eq!(candidate.path, "a.txt");
        assert_eq!(candidate.old.location.to_str(), Some("/old/a.txt"));
        assert_eq!(candidate.new.location.to_str(), Some("/new/a.txt"));
    }

    #[test]
    fn resolve_routes_candidates_by_verdict() {
        let old = snapshot("/old", &[("a.dll", "1"), ("b.dll", "1"), ("c.dll", "1")]);
        let new = snapshot("/new", &[("a.dll", "2"), ("b.dll", "2"), ("c.dll", "2")]);

        let mut verdicts = BTreeMap::new();
        verdicts.insert("a.dll".to_string(), true);
        verdicts.insert("b.dll".to_string(), false);

        let result = classify(&old, &new).resolve(&verdicts);
        assert_eq!(result.unchanged.iter().collect::<Vec<_>>(), vec!["a.dll"]);
        assert_eq!(result.modified.iter().collect::<Vec<_>>(), vec!["b.dll", "c.dll"]);
        assert_eq!(result.total_paths(), 3);
        assert!(!result.is_identical());
    }

    #[test]
    fn empty_snapshots() {
        let c = classify(&Snapshot::default(), &Snapshot::default());
        assert_eq!(c, Classification::default());
        assert!(c.resolve(&BTreeMap::new()).is_identical());
    }

    fn tree() -> impl Strategy<Value = Snapshot> {
        prop::collection::btree_map("[a-d]{1,2}(/[a-d]{1,2})?\\.(txt|dll)", any::<u8>(), 0..16)
            .prop_map(|files| {
                Snapshot::from_records(
                    "/t",
                    files.into_iter().map(|(path, byte)| {
                        FileRecord::new(path.clone(), Fingerprint::of_bytes(&[byte]), path, 1)
                    }),
                )
            })
    }

    proptest! {
        #[test]
        fn classifying_a_snapshot_against_itself_is_all_unchanged(s in tree()) {
            let c = classify(&s, &s);
            prop_assert!(c.added.is_empty());
            prop_assert!(c.removed.is_empty());
            prop_assert!(c.candidates.is_empty());
            prop_assert_eq!(c.unchanged, s.paths().map(String::from).collect::<Vec<_>>());
        }

        #[test]
        fn swapping_sides_swaps_added_and_removed(a in tree(), b in tree()) {
            let forward = classify(&a, &b);
            let backward = classify(&b, &a);
            prop_assert_eq!(&forward.added, &backward.removed);
            prop_assert_eq!(&forward.removed, &backward.added);
        }

        #[test]
        fn result_partitions_the_key_union(a in tree(), b in tree()) {
            let result = classify(&a, &b).resolve(&BTreeMap::new());
            let union: BTreeSet<&str> = a.paths().chain(b.paths()).collect();
            prop_assert_eq!(result.total_paths(), union.len());
            let mut seen = BTreeSet::new();
            for path in result.added.iter()
                .chain(&result.removed)
                .chain(&result.modified)
                .chain(&result.unchanged)
            {
                prop_assert!(seen.insert(path.as_str()), "path classified twice: {}", path);
            }
            prop_assert_eq!(seen, union);
        }
    }
}
