use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use drift_compare::{ComparatorRegistry, Disassembler, DispatchOutcome, ProcessDisassembler};
use drift_diff::{classify, Candidate, ClassificationResult};
use drift_report::{Report, ReportBuilder};
use drift_scan::{Snapshot, TreeScanner};

use crate::config::DriftConfig;
use crate::error::{EngineError, EngineResult};

/// The result of one run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Four-way partition of every path in both trees.
    pub classification: ClassificationResult,
    /// The assembled report, ready to render.
    pub report: Report,
}

/// Compares two directory trees.
pub struct Drift {
    config: DriftConfig,
    scanner: TreeScanner,
    registry: Arc<ComparatorRegistry>,
}

impl Drift {
    /// Create an engine that runs the configured external disassembler.
    pub fn new(config: DriftConfig) -> Self {
        let disassembler = Arc::new(ProcessDisassembler::new(config.compare.disassembler.clone()));
        Self::with_disassembler(config, disassembler)
    }

    /// Create an engine with a caller-supplied disassembler.
    pub fn with_disassembler(config: DriftConfig, disassembler: Arc<dyn Disassembler>) -> Self {
        let registry = ComparatorRegistry::with_defaults(&config.compare, disassembler);
        Self::with_registry(config, registry)
    }

    /// Create an engine with a fully custom comparator registry.
    pub fn with_registry(config: DriftConfig, registry: ComparatorRegistry) -> Self {
        Self {
            scanner: TreeScanner::new(config.scan.clone()),
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    // ---- Pipeline ----

    /// Scan both roots concurrently and compare them.
    ///
    /// Fails only if a tree cannot be scanned. Per-file problems are
    /// reported as warnings in the report.
    pub async fn compare(
        &self,
        old_root: impl AsRef<Path>,
        new_root: impl AsRef<Path>,
    ) -> EngineResult<RunOutcome> {
        let (old, new) = tokio::try_join!(
            self.scanner.scan(old_root.as_ref()),
            self.scanner.scan(new_root.as_ref())
        )?;
        self.compare_snapshots(&old, &new).await
    }

    /// Compare two already-scanned snapshots.
    pub async fn compare_snapshots(&self, old: &Snapshot, new: &Snapshot) -> EngineResult<RunOutcome> {
        let classification = classify(old, new);
        info!(
            added = classification.added.len(),
            removed = classification.removed.len(),
            unchanged = classification.unchanged.len(),
            candidates = classification.candidates.len(),
            "classified snapshots"
        );

        let mut builder = ReportBuilder::new(old.root(), new.root());
        builder.set_totals(old.len(), new.len());

        let outcomes = self.dispatch_all(classification.candidates.clone()).await?;
        let mut verdicts = BTreeMap::new();
        let mut diffs = BTreeMap::new();
        for outcome in outcomes {
            builder.extend_warnings(outcome.warnings);
            if let (false, Some(diff)) = (outcome.verdict.equal, outcome.verdict.diff) {
                diffs.insert(outcome.path.clone(), diff);
            }
            verdicts.insert(outcome.path, outcome.verdict.equal);
        }

        let result = classification.resolve(&verdicts);
        builder.record_classification(&result, &mut diffs);
        let report = builder.build(self.config.include_unchanged);

        info!(
            added = report.summary.added,
            removed = report.summary.removed,
            modified = report.summary.modified,
            unchanged = report.summary.unchanged,
            warnings = report.warnings.len(),
            "comparison complete"
        );
        Ok(RunOutcome {
            classification: result,
            report,
        })
    }

    /// Run the registry over every candidate, at most `compare_jobs` at a
    /// time. Outcomes come back in completion order.
    async fn dispatch_all(&self, candidates: Vec<Candidate>) -> EngineResult<Vec<DispatchOutcome>> {
        let permits = Arc::new(Semaphore::new(self.config.compare_jobs.max(1)));
        let mut tasks = JoinSet::new();
        let mut outcomes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| EngineError::Task(e.to_string()))?;
            let registry = Arc::clone(&self.registry);
            tasks.spawn(async move {
                let _permit = permit;
                registry.dispatch(&candidate.old, &candidate.new).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| EngineError::Task(e.to_string()))?;
            debug!(path = %outcome.path, equal = outcome.verdict.equal, "candidate resolved");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
