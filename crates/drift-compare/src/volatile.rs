//! Removal of per-build lines from disassembly output.

/// Drops lines that change on every build (module version IDs, image base
/// addresses) so two builds of the same source compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VolatileFilter {
    prefixes: Vec<String>,
}

impl VolatileFilter {
    /// Filter lines whose leading-whitespace-trimmed text starts with any of
    /// `prefixes`.
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `line` carries per-build data.
    pub fn is_volatile(&self, line: &str) -> bool {
        let line = line.trim_start();
        self.prefixes.iter().any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Keep only the stable lines, in order.
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        if self.prefixes.is_empty() {
            return lines;
        }
        lines.into_iter().filter(|line| !self.is_volatile(line)).collect()
    }
}
