use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use drift_types::FileRecord;

use crate::comparator::{differing_lines, Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
use crate::disasm::Disassembler;
use crate::error::{CompareError, CompareResult, DisassemblyError};
use crate::volatile::VolatileFilter;

/// Compares compiled modules by their disassembly.
///
/// Both sides are disassembled, per-build lines are filtered out, and the
/// remaining lines are compared in order. Once the disassembler reports
/// itself missing, later pairs fail fast without spawning it again.
pub struct DisassemblyComparator {
    disassembler: Arc<dyn Disassembler>,
    filter: VolatileFilter,
    tool_missing: AtomicBool,
}

impl DisassemblyComparator {
    pub fn new(disassembler: Arc<dyn Disassembler>, filter: VolatileFilter) -> Self {
        Self {
            disassembler,
            filter,
            tool_missing: AtomicBool::new(false),
        }
    }

    fn unavailable(&self) -> CompareError {
        CompareError::ToolUnavailable {
            program: self.disassembler.program().to_string(),
        }
    }
}

#[async_trait]
impl Comparator for DisassemblyComparator {
    fn name(&self) -> &str {
        "disassembly"
    }

    async fn compare(
        &self,
        old: &FileRecord,
        new: &FileRecord,
        options: &CompareOptions,
    ) -> CompareResult<CompareOutcome> {
        if self.tool_missing.load(Ordering::Acquire) {
            return Err(self.unavailable());
        }

        let (old_result, new_result) = tokio::join!(
            self.disassembler.disassemble(&old.location),
            self.disassembler.disassemble(&new.location),
        );

        let (old_lines, new_lines) = match (old_result, new_result) {
            (Ok(old_lines), Ok(new_lines)) => (old_lines, new_lines),
            (Err(DisassemblyError::ToolUnavailable { .. }), _)
            | (_, Err(DisassemblyError::ToolUnavailable { .. })) => {
                self.tool_missing.store(true, Ordering::Release);
                return Err(self.unavailable());
            }
            (old_result, new_result) => {
                let reasons: Vec<String> = [("old", old_result), ("new", new_result)]
                    .into_iter()
                    .filter_map(|(side, result)| match result {
                        Err(DisassemblyError::Refused { reason, .. }) => Some(format!("{side}: {reason}")),
                        _ => None,
                    })
                    .collect();
                return Err(CompareError::DisassemblyRefused {
                    path: old.relative_path.clone(),
                    reason: reasons.join("; "),
                });
            }
        };

        let old_lines = self.filter.apply(old_lines);
        let new_lines = self.filter.apply(new_lines);
        if old_lines == new_lines {
            return Ok(CompareOutcome::new(ComparisonVerdict::equal()));
        }

        differing_lines(&old.relative_path, old_lines, new_lines, options).await
    }
}
