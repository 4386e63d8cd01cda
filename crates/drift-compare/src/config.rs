use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::category::{CategoryTable, FileCategory};
use crate::comparator::CompareOptions;

/// Configuration for comparator dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Render line diffs for modified text files and compiled modules.
    pub detailed_diff: bool,
    /// Maximum number of lines per side fed to the LCS renderer.
    pub max_diff_lines: usize,
    /// Plain-text comparison settings.
    pub text: TextConfig,
    /// External disassembler settings.
    pub disassembler: DisassemblerConfig,
    /// Extension → category overrides applied on top of the defaults.
    pub categories: BTreeMap<String, FileCategory>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            detailed_diff: false,
            max_diff_lines: 5_000,
            text: TextConfig::default(),
            disassembler: DisassemblerConfig::default(),
            categories: BTreeMap::new(),
        }
    }
}

impl CompareConfig {
    /// The default category table with this config's overrides applied.
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::default().with_overrides(&self.categories)
    }

    /// Per-comparison options derived from this config.
    pub fn options(&self) -> CompareOptions {
        CompareOptions {
            detailed_diff: self.detailed_diff,
            max_diff_lines: self.max_diff_lines,
        }
    }
}

/// Plain-text comparison settings. Both normalizations are off by default,
/// so text equality is exact after decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Treat `\r\n` and `\n` as the same line ending.
    pub normalize_line_endings: bool,
    /// Ignore trailing spaces and tabs on every line.
    pub trim_trailing_whitespace: bool,
}

/// How to run the external disassembler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisassemblerConfig {
    /// Executable name or path.
    pub program: String,
    /// Arguments; `{input}` is replaced by the module's absolute path. When
    /// no argument mentions `{input}` the path is appended.
    pub args: Vec<String>,
    /// Per-invocation timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of disassembler processes running at once.
    pub max_concurrent: usize,
    /// Output lines starting with any of these prefixes are dropped before
    /// comparison.
    pub volatile_prefixes: Vec<String>,
    /// Case-insensitive output fragments meaning the tool refused the input.
    pub refusal_patterns: Vec<String>,
}

impl Default for DisassemblerConfig {
    fn default() -> Self {
        Self {
            program: "ildasm".into(),
            args: vec!["/text".into(), "/nobar".into(), "{input}".into()],
            timeout_secs: 60,
            max_concurrent: 4,
            volatile_prefixes: vec!["// MVID:".into(), "// Image base:".into()],
            refusal_patterns: vec![
                "access is denied".into(),
                "cannot disassemble".into(),
                "SuppressIldasmAttribute".into(),
            ],
        }
    }
}

impl DisassemblerConfig {
    /// The per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CompareConfig::default();
        assert!(!c.detailed_diff);
        assert_eq!(c.max_diff_lines, 5_000);
        assert!(!c.text.normalize_line_endings);
        assert_eq!(c.disassembler.program, "ildasm");
        assert_eq!(c.disassembler.timeout(), Duration::from_secs(60));
        assert_eq!(c.disassembler.max_concurrent, 4);
        assert!(c.categories.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: CompareConfig = toml::from_str(
            r#"
            detailed_diff = true

            [disassembler]
            program = "/opt/tools/ildasm"
            timeout_secs = 5

            [categories]
            nupkg = "ignored"
            "#,
        )
        .unwrap();
        assert!(c.detailed_diff);
        assert_eq!(c.max_diff_lines, 5_000);
        assert_eq!(c.disassembler.program, "/opt/tools/ildasm");
        assert_eq!(c.disassembler.timeout_secs, 5);
        assert_eq!(c.disassembler.max_concurrent, 4);
        assert_eq!(c.disassembler.volatile_prefixes.len(), 2);
        assert_eq!(c.category_table().category_of_extension("nupkg"), FileCategory::Ignored);
        assert_eq!(c.category_table().category_of_extension("dll"), FileCategory::CompiledModule);
    }

    #[test]
    fn options_follow_config() {
        let c = CompareConfig {
            detailed_diff: true,
            max_diff_lines: 10,
            ..Default::default()
        };
        assert_eq!(c.options(), CompareOptions { detailed_diff: true, max_diff_lines: 10 });
    }
}
