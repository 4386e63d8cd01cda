//! Longest-common-subsequence line diff.
//!
//! The renderer fills the classic `(m + 1) x (n + 1)` dynamic-programming
//! table and walks it back from the bottom-right corner. Both time and
//! memory are O(m·n), which makes this the most expensive step of a run for
//! large disassemblies; callers that cannot trust their input sizes should
//! go through [`diff_lines_bounded`].

use crate::error::{DiffError, DiffResult};
use crate::line::DiffLine;

/// LCS length table for two sequences, stored row-major.
///
/// `get(i, j)` is the length of the longest common subsequence of `a[..i]`
/// and `b[..j]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Fill the table for `a` and `b`.
    pub fn build<S: AsRef<str>>(a: &[S], b: &[S]) -> Self {
        let cols = b.len() + 1;
        let mut cells = vec![0u32; (a.len() + 1) * cols];

        for i in 1..=a.len() {
            let row = i * cols;
            let prev = (i - 1) * cols;
            let line = a[i - 1].as_ref();
            for j in 1..=b.len() {
                cells[row + j] = if line == b[j - 1].as_ref() {
                    cells[prev + j - 1] + 1
                } else {
                    cells[prev + j].max(cells[row + j - 1])
                };
            }
        }

        Self { cols, cells }
    }

    /// Table cell `L[i][j]`.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }

    /// Length of the longest common subsequence of the full inputs.
    pub fn lcs_len(&self) -> usize {
        self.cells.last().copied().unwrap_or(0) as usize
    }
}

/// Compute the edit script turning `a` into `b`.
///
/// On a mismatch with equal scores the walk prefers an insertion over a
/// deletion, so for a replaced line the deletion is listed first once the
/// script is put back in forward order.
pub fn diff_lines<S: AsRef<str>>(a: &[S], b: &[S]) -> Vec<DiffLine> {
    let table = LcsTable::build(a, b);
    let mut script = Vec::with_capacity(a.len() + b.len() - table.lcs_len());

    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1].as_ref() == b[j - 1].as_ref() {
            script.push(DiffLine::context(a[i - 1].as_ref()));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table.get(i, j - 1) >= table.get(i - 1, j)) {
            script.push(DiffLine::insert(b[j - 1].as_ref()));
            j -= 1;
        } else {
            script.push(DiffLine::delete(a[i - 1].as_ref()));
            i -= 1;
        }
    }

    script.reverse();
    script
}

/// [`diff_lines`], refusing inputs with more than `max_lines` lines on
/// either side.
pub fn diff_lines_bounded<S: AsRef<str>>(
    a: &[S],
    b: &[S],
    max_lines: usize,
) -> DiffResult<Vec<DiffLine>> {
    if a.len() > max_lines || b.len() > max_lines {
        return Err(DiffError::InputTooLarge {
            old_lines: a.len(),
            new_lines: b.len(),
            limit: max_lines,
        });
    }
    Ok(diff_lines(a, b))
}
