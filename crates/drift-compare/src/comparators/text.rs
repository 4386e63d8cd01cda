use async_trait::async_trait;
use tracing::debug;

use drift_types::FileRecord;

use crate::comparator::{differing_lines, Comparator, CompareOptions, CompareOutcome, ComparisonVerdict};
use crate::config::TextConfig;
use crate::error::{CompareError, CompareResult};

/// Compares decoded file text for exact equality.
///
/// Byte-order marks select the decoding and are not part of the text, so a
/// file re-saved with a BOM still compares equal. Anything beyond that is
/// only normalized when [`TextConfig`] asks for it. Content that does not
/// decode is compared byte for byte and gets no line diff.
#[derive(Clone, Debug, Default)]
pub struct TextComparator {
    config: TextConfig,
}

impl TextComparator {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    fn normalize(&self, text: String) -> String {
        let text = if self.config.normalize_line_endings {
            text.replace("\r\n", "\n")
        } else {
            text
        };
        if !self.config.trim_trailing_whitespace {
            return text;
        }
        text.split('\n')
            .map(|line| match line.strip_suffix('\r') {
                Some(body) => format!("{}\r", body.trim_end_matches([' ', '\t'])),
                None => line.trim_end_matches([' ', '\t']).to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Comparator for TextComparator {
    fn name(&self) -> &str {
        "text"
    }

    async fn compare(
        &self,
        old: &FileRecord,
        new: &FileRecord,
        options: &CompareOptions,
    ) -> CompareResult<CompareOutcome> {
        let (old_bytes, new_bytes) = tokio::try_join!(read(old), read(new))?;
        let (Some(old_text), Some(new_text)) = (decode_text(&old_bytes), decode_text(&new_bytes)) else {
            debug!(path = %old.relative_path, "content is not decodable text, comparing bytes");
            let verdict = if old_bytes == new_bytes {
                ComparisonVerdict::equal()
            } else {
                ComparisonVerdict::different()
            };
            return Ok(CompareOutcome::new(verdict));
        };

        let old_text = self.normalize(old_text);
        let new_text = self.normalize(new_text);
        if old_text == new_text {
            return Ok(CompareOutcome::new(ComparisonVerdict::equal()));
        }

        let (old_lines, new_lines) = diff_inputs(&old_text, &new_text);
        differing_lines(&old.relative_path, old_lines, new_lines, options).await
    }
}

async fn read(record: &FileRecord) -> CompareResult<Vec<u8>> {
    tokio::fs::read(&record.location)
        .await
        .map_err(|source| CompareError::ContentRead {
            path: record.relative_path.clone(),
            source,
        })
}

/// Marker line appended when the text does not end with a newline.
pub const NO_FINAL_NEWLINE: &str = "\\ No newline at end of file";

/// Decode file content as text.
///
/// A UTF-8 BOM is stripped and a UTF-16 BOM (either byte order) selects
/// UTF-16. Returns `None` when the content is not valid in the selected
/// encoding.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF_u8, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).ok();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF_u8, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE_u8, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes.to_vec()).ok()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Split text into lines on `\n` only, so a `\r` stays part of its line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line).to_string())
        .collect()
}

/// Line sequences to diff. When exactly one side lacks a final newline, that
/// side gets a trailing [`NO_FINAL_NEWLINE`] line so the difference is visible.
fn diff_inputs(old: &str, new: &str) -> (Vec<String>, Vec<String>) {
    let open = |text: &str| !text.is_empty() && !text.ends_with('\n');
    let mut old_lines = split_lines(old);
    let mut new_lines = split_lines(new);
    if open(old) != open(new) {
        let side = if open(old) { &mut old_lines } else { &mut new_lines };
        side.push(NO_FINAL_NEWLINE.to_string());
    }
    (old_lines, new_lines)
}
