//! Extension → file category table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use drift_types::FileRecord;

/// How a file kind is compared once its fingerprints differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    /// Expected to vary between builds; always considered equal.
    Ignored,
    /// Compared as decoded text.
    PlainText,
    /// Compared through the external disassembler.
    CompiledModule,
    /// Anything else; differing fingerprints mean different content.
    Unclassified,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ignored => "ignored",
            Self::PlainText => "plain-text",
            Self::CompiledModule => "compiled-module",
            Self::Unclassified => "unclassified",
        };
        f.write_str(label)
    }
}

const IGNORED: &[&str] = &["pdb", "cache", "log"];

const PLAIN_TEXT: &[&str] = &[
    "txt", "md", "json", "xml", "config", "yml", "yaml", "toml", "ini", "csv", "html", "htm",
    "css", "js", "ps1", "psm1", "bat", "cmd", "sh", "xaml", "resx", "props", "targets", "nuspec",
];

const COMPILED_MODULE: &[&str] = &["dll", "exe"];

/// Explicit mapping from lower-case extension (no dot) to [`FileCategory`].
///
/// Extensions missing from the table, and files without an extension, are
/// [`FileCategory::Unclassified`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    entries: BTreeMap<String, FileCategory>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (extensions, category) in [
            (IGNORED, FileCategory::Ignored),
            (PLAIN_TEXT, FileCategory::PlainText),
            (COMPILED_MODULE, FileCategory::CompiledModule),
        ] {
            for ext in extensions {
                table.insert(ext, category);
            }
        }
        table
    }
}

impl CategoryTable {
    /// A table with no entries: everything is unclassified.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Map `extension` to `category`, replacing any previous entry.
    ///
    /// A leading dot and letter case are ignored.
    pub fn insert(&mut self, extension: &str, category: FileCategory) -> Option<FileCategory> {
        self.entries.insert(normalize_extension(extension), category)
    }

    /// Apply overrides on top of the current entries.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a FileCategory)>,
    ) -> Self {
        for (extension, category) in overrides {
            self.insert(extension, *category);
        }
        self
    }

    /// Category for an extension.
    pub fn category_of_extension(&self, extension: &str) -> FileCategory {
        self.entries
            .get(&normalize_extension(extension))
            .copied()
            .unwrap_or(FileCategory::Unclassified)
    }

    /// Category for a scanned file, derived from its relative path.
    pub fn category_of(&self, record: &FileRecord) -> FileCategory {
        record
            .extension()
            .map(|ext| self.category_of_extension(&ext))
            .unwrap_or(FileCategory::Unclassified)
    }

    /// Number of mapped extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no extension is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
