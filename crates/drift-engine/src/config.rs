//! Run configuration.

use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use drift_compare::CompareConfig;
use drift_scan::ScanConfig;

use crate::error::{EngineError, EngineResult};

/// Everything that shapes one drift run. Every field has a default, so a
/// TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// List unchanged paths in the report.
    pub include_unchanged: bool,
    /// Maximum number of candidate pairs compared concurrently.
    pub compare_jobs: usize,
    pub scan: ScanConfig,
    pub compare: CompareConfig,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            include_unchanged: false,
            compare_jobs: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            scan: ScanConfig::default(),
            compare: CompareConfig::default(),
        }
    }
}

impl DriftConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_compare::FileCategory;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(DriftConfig::from_toml_str("").unwrap(), DriftConfig::default());
    }

    #[test]
    fn nested_sections() {
        let config = DriftConfig::from_toml_str(
            r#"
            include_unchanged = true
            compare_jobs = 2

            [scan]
            hash_workers = 3

            [compare]
            detailed_diff = true
            max_diff_lines = 100

            [compare.text]
            normalize_line_endings = true

            [compare.disassembler]
            program = "monodis"
            args = ["{input}"]
            volatile_prefixes = ["// GUID"]

            [compare.categories]
            cs = "plain-text"
            "#,
        )
        .unwrap();

        assert!(config.include_unchanged);
        assert_eq!(config.compare_jobs, 2);
        assert_eq!(config.scan.hash_workers, 3);
        assert!(config.compare.detailed_diff);
        assert_eq!(config.compare.max_diff_lines, 100);
        assert!(config.compare.text.normalize_line_endings);
        assert!(!config.compare.text.trim_trailing_whitespace);
        assert_eq!(config.compare.disassembler.program, "monodis");
        assert_eq!(config.compare.disassembler.timeout_secs, 60);
        assert_eq!(config.compare.categories.get("cs"), Some(&FileCategory::PlainText));
    }

    #[test]
    fn invalid_document_is_config_error() {
        let err = DriftConfig::from_toml_str("compare_jobs = \"many\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DriftConfig::load(&dir.path().join("drift.toml")).unwrap_err();
        assert!(err.to_string().contains("drift.toml"));
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = DriftConfig::default();
        config.compare.categories.insert("nupkg".into(), FileCategory::Ignored);
        let text = config.to_toml_string().unwrap();
        assert_eq!(DriftConfig::from_toml_str(&text).unwrap(), config);
    }
}
