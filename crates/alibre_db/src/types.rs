//! Record types stored in the Alibre library database.
//!
//! These types are the single source of truth for the CLI and the library
//! services.

use serde::{Deserialize, Serialize};

/// A discovered e-book file.
///
/// Only metadata is stored; file content is read on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Row id (0 until inserted)
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    /// Absolute path of the file; identifies the book
    pub file_path: String,
    /// Upper-case extension label ("PDF", "EPUB", "HTM", ...)
    pub format: String,
    pub cover_image_path: Option<String>,
    /// Opaque reading locator (the reader stores a line offset)
    pub last_read_position: Option<String>,
    pub total_pages: Option<i32>,
    /// Unix millis of the last open, 0 = never opened
    pub last_opened_at: i64,
}

impl Book {
    /// Fresh record for a newly discovered file.
    pub fn new(
        title: impl Into<String>,
        author: Option<String>,
        file_path: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author,
            file_path: file_path.into(),
            format: format.into(),
            cover_image_path: None,
            last_read_position: None,
            total_pages: None,
            last_opened_at: 0,
        }
    }

    pub fn has_been_opened(&self) -> bool {
        self.last_opened_at > 0
    }
}

/// A user-selected root folder whose contents are scanned for books.
///
/// The stored row doubles as the persisted access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFolder {
    /// Row id (0 until inserted)
    pub id: i64,
    /// Absolute folder path
    pub path: String,
}

impl LibraryFolder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: 0,
            path: path.into(),
        }
    }
}

/// Aggregate counts over the library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_folders: u64,
    pub total_books: u64,
    pub books_opened: u64,
    pub books_by_format: Vec<FormatCount>,
}

/// Number of books recorded for one format label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCount {
    pub format: String,
    pub count: u64,
}
