//! Plain-text loading and whitespace normalization shared by the extractors.

use super::error::{ReaderError, Result};
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read a file as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; a leading BOM
/// is dropped.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ReaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Accumulates text runs into paragraphs.
///
/// Whitespace inside a paragraph collapses to single spaces; paragraphs are
/// joined by a blank line.
#[derive(Debug, Default)]
pub(crate) struct TextBuilder {
    paragraphs: Vec<String>,
    current: String,
    pending_space: bool,
}

impl TextBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = !self.current.is_empty();
            } else {
                if self.pending_space {
                    self.current.push(' ');
                    self.pending_space = false;
                }
                self.current.push(ch);
            }
        }
    }

    /// Close the current paragraph, if it holds any text.
    pub(crate) fn paragraph_break(&mut self) {
        self.pending_space = false;
        if !self.current.is_empty() {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
    }

    pub(crate) fn finish(mut self) -> String {
        self.paragraph_break();
        self.paragraphs.join("\n\n")
    }
}
