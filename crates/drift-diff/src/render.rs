//! Text rendering of edit scripts.

use serde::{Deserialize, Serialize};

use crate::line::{DiffLine, DiffOp};

/// Line counts of an edit script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub context: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Count the lines of `script` by operation.
    pub fn of(script: &[DiffLine]) -> Self {
        script.iter().fold(Self::default(), |mut stats, line| {
            match line.op {
                DiffOp::Context => stats.context += 1,
                DiffOp::Insert => stats.insertions += 1,
                DiffOp::Delete => stats.deletions += 1,
            }
            stats
        })
    }

    /// Returns `true` if the script changes nothing.
    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

/// Render `script` as a fenced `diff` block.
///
/// Context, insert, and delete lines are prefixed with a space, `+`, and `-`.
/// The fence is one backtick longer than the longest backtick run in the
/// script (at least three), so quoted fences cannot close the block.
pub fn render_fenced(script: &[DiffLine]) -> String {
    let longest_run = script
        .iter()
        .map(|line| longest_backtick_run(&line.text))
        .max()
        .unwrap_or(0);
    let fence = "`".repeat((longest_run + 1).max(3));

    let body: usize = script.iter().map(|l| l.text.len() + 2).sum();
    let mut out = String::with_capacity(body + 2 * fence.len() + 6);
    out.push_str(&fence);
    out.push_str("diff\n");
    for line in script {
        out.push(line.op.prefix());
        out.push_str(&line.text);
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
    out
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}
