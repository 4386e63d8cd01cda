use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use drift_types::{FileRecord, Warning, WarningKind};

use crate::category::{CategoryTable, FileCategory};
use crate::comparator::{Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
use crate::comparators::{DisassemblyComparator, FingerprintComparator, IgnoreComparator, TextComparator};
use crate::config::CompareConfig;
use crate::disasm::Disassembler;
use crate::error::CompareError;
use crate::volatile::VolatileFilter;

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// The result of dispatching one candidate pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Relative path of the pair.
    pub path: String,
    /// Category the path's extension mapped to.
    pub category: FileCategory,
    /// Name of the comparator that ran.
    pub comparator: String,
    /// Equality verdict (and optional diff).
    pub verdict: ComparisonVerdict,
    /// Non-fatal conditions met while comparing.
    pub warnings: Vec<Warning>,
}

// ---------------------------------------------------------------------------
// ComparatorRegistry
// ---------------------------------------------------------------------------

/// Maps file categories to comparators and runs them with degrade-and-continue
/// error handling.
///
/// Adding a new file kind means adding a [`CategoryTable`] entry and, if it
/// needs its own strategy, registering a comparator for a category. A
/// category without a registered comparator falls back to fingerprint
/// equality.
pub struct ComparatorRegistry {
    table: CategoryTable,
    comparators: BTreeMap<FileCategory, Arc<dyn Comparator>>,
    fallback: Arc<dyn Comparator>,
    options: CompareOptions,
    tool_missing_reported: AtomicBool,
}

impl ComparatorRegistry {
    /// Create a registry with no comparators registered.
    pub fn new(table: CategoryTable, options: CompareOptions) -> Self {
        Self {
            table,
            comparators: BTreeMap::new(),
            fallback: Arc::new(FingerprintComparator),
            options,
            tool_missing_reported: AtomicBool::new(false),
        }
    }

    /// Create a registry with the built-in comparator for every category.
    pub fn with_defaults(config: &CompareConfig, disassembler: Arc<dyn Disassembler>) -> Self {
        let mut registry = Self::new(config.category_table(), config.options());
        registry.register(FileCategory::Ignored, Arc::new(IgnoreComparator));
        registry.register(
            FileCategory::PlainText,
            Arc::new(TextComparator::new(config.text.clone())),
        );
        registry.register(
            FileCategory::CompiledModule,
            Arc::new(DisassemblyComparator::new(
                disassembler,
                VolatileFilter::new(config.disassembler.volatile_prefixes.iter().cloned()),
            )),
        );
        registry.register(FileCategory::Unclassified, Arc::new(FingerprintComparator));
        registry
    }

    /// Register `comparator` for `category`, returning the one it replaces.
    pub fn register(
        &mut self,
        category: FileCategory,
        comparator: Arc<dyn Comparator>,
    ) -> Option<Arc<dyn Comparator>> {
        self.comparators.insert(category, comparator)
    }

    /// The extension → category table.
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// The options passed to every comparator.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// The comparator that handles `category`.
    pub fn comparator_for(&self, category: FileCategory) -> &dyn Comparator {
        self.comparators
            .get(&category)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Compare one candidate pair. Never fails: comparator errors become
    /// warnings and a "different" verdict.
    pub async fn dispatch(&self, old: &FileRecord, new: &FileRecord) -> DispatchOutcome {
        let category = self.table.category_of(new);
        let comparator = self.comparator_for(category);

        let outcome = match comparator.compare(old, new, &self.options).await {
            Ok(outcome) => outcome,
            Err(err) => CompareOutcome::degraded(
                self.warning_for(&new.relative_path, err).into_iter().collect(),
            ),
        };

        debug!(
            path = %new.relative_path,
            %category,
            comparator = comparator.name(),
            equal = outcome.verdict.equal,
            "compared candidate"
        );

        DispatchOutcome {
            path: new.relative_path.clone(),
            category,
            comparator: comparator.name().to_string(),
            verdict: outcome.verdict,
            warnings: outcome.warnings,
        }
    }

    /// Turn a comparator error into a warning. A missing disassembler is
    /// reported once per registry.
    fn warning_for(&self, path: &str, err: CompareError) -> Option<Warning> {
        let warning = match &err {
            CompareError::ToolUnavailable { .. } => {
                if self.tool_missing_reported.swap(true, Ordering::AcqRel) {
                    return None;
                }
                Warning::general(
                    WarningKind::ToolUnavailable,
                    format!("{err}; compiled modules with differing bytes are reported as modified"),
                )
            }
            CompareError::DisassemblyRefused { path, .. } => {
                Warning::for_path(WarningKind::DisassemblyRefused, path.clone(), err.to_string())
            }
            CompareError::ContentRead { path, .. } => {
                Warning::for_path(WarningKind::ContentRead, path.clone(), err.to_string())
            }
            CompareError::Task(_) => {
                Warning::for_path(WarningKind::ComparisonFailed, path, err.to_string())
            }
        };
        warn!(kind = %warning.kind, "{}", warning.message);
        Some(warning)
    }
}
