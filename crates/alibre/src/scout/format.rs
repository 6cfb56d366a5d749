//! E-book format classification by file extension.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File formats the scanner records as books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Pdf,
    Txt,
    Epub,
    Html,
    Htm,
    Mobi,
    Azw,
    Azw3,
    Fb2,
    Rtf,
}

impl BookFormat {
    pub const ALL: [BookFormat; 10] = [
        BookFormat::Pdf,
        BookFormat::Txt,
        BookFormat::Epub,
        BookFormat::Html,
        BookFormat::Htm,
        BookFormat::Mobi,
        BookFormat::Azw,
        BookFormat::Azw3,
        BookFormat::Fb2,
        BookFormat::Rtf,
    ];

    /// Classify a bare extension (no dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == lower)
    }

    /// Classify a file name by its final extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        file_extension(name).and_then(Self::from_extension)
    }

    /// Parse a stored format label ("PDF", "htm", ...).
    pub fn parse(label: &str) -> Option<Self> {
        Self::from_extension(label.trim())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            BookFormat::Pdf => "pdf",
            BookFormat::Txt => "txt",
            BookFormat::Epub => "epub",
            BookFormat::Html => "html",
            BookFormat::Htm => "htm",
            BookFormat::Mobi => "mobi",
            BookFormat::Azw => "azw",
            BookFormat::Azw3 => "azw3",
            BookFormat::Fb2 => "fb2",
            BookFormat::Rtf => "rtf",
        }
    }

    /// Label stored in the book record: the upper-cased extension.
    pub fn label(&self) -> &'static str {
        match self {
            BookFormat::Pdf => "PDF",
            BookFormat::Txt => "TXT",
            BookFormat::Epub => "EPUB",
            BookFormat::Html => "HTML",
            BookFormat::Htm => "HTM",
            BookFormat::Mobi => "MOBI",
            BookFormat::Azw => "AZW",
            BookFormat::Azw3 => "AZW3",
            BookFormat::Fb2 => "FB2",
            BookFormat::Rtf => "RTF",
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text after the last `.` of a file name.
///
/// `None` when the name has no dot or ends with one.
pub fn file_extension(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;
    let ext = &name[idx + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
