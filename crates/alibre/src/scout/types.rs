//! Types produced by a folder scan.

use super::filename::{author_from_file_name, title_from_file_name};
use super::format::BookFormat;
use alibre_db::Book;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A supported e-book file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredBook {
    pub path: PathBuf,
    pub file_name: String,
    pub title: String,
    pub author: Option<String>,
    pub format: BookFormat,
}

impl DiscoveredBook {
    /// Build from a file path; `None` when the extension is not supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let format = BookFormat::from_file_name(&file_name)?;
        Some(Self {
            path: path.to_path_buf(),
            title: title_from_file_name(&file_name),
            author: author_from_file_name(&file_name),
            file_name,
            format,
        })
    }

    /// Absolute path as stored in the book record.
    pub fn file_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Fresh book record: no cover, no position, never opened.
    pub fn to_book(&self) -> Book {
        Book::new(
            self.title.clone(),
            self.author.clone(),
            self.file_path(),
            self.format.label(),
        )
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub dirs_scanned: u64,
    pub files_seen: u64,
    pub books_found: u64,
    pub files_skipped: u64,
    pub errors: u64,
    pub duration_ms: u64,
}

/// An entry that could not be read; the scan carried on without it.
#[derive(Debug, Clone, Serialize)]
pub struct ScanError {
    pub path: String,
    pub message: String,
}

/// Result of scanning one folder tree.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    pub books: Vec<DiscoveredBook>,
    pub stats: ScanStats,
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    pub fn to_books(&self) -> Vec<Book> {
        self.books.iter().map(DiscoveredBook::to_book).collect()
    }
}
