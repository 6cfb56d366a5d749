//! Recursive library folder scanner
//!
//! Walks a granted folder tree, classifies every file by extension and
//! returns the supported ones. The scanner never touches the database;
//! [`crate::library::Library`] decides what gets recorded.
//!
//! # Design
//!
//! - Walk with `walkdir`, entries sorted by name so results are stable
//! - Recursion is bounded by `ScanConfig::max_depth`
//! - An unreadable entry is recorded in `ScanResult::errors` and skipped;
//!   only an inaccessible root fails the scan

use super::access::check_access;
use super::error::{Result, ScoutError};
use super::types::{DiscoveredBook, ScanError, ScanResult, ScanStats};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into.
pub const DEFAULT_EXCLUDE_DIR_NAMES: &[&str] = &[
    ".git",     // VCS internals
    ".Trash",   // macOS trash
    "__MACOSX", // resource forks left by zip extraction
];

/// Configuration for scanning operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth below the root
    pub max_depth: usize,
    /// Whether to follow symlinks
    pub follow_symlinks: bool,
    /// Whether to include hidden files/directories
    pub include_hidden: bool,
    /// Directory names to skip (matched against the name, not the path)
    pub exclude_dir_names: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            follow_symlinks: false,
            include_hidden: true,
            exclude_dir_names: DEFAULT_EXCLUDE_DIR_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Library folder scanner
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan a folder tree for supported e-book files.
    ///
    /// Fails only when the root itself is not accessible.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let start = Instant::now();
        check_access(root).into_result(root)?;
        let root = root.canonicalize()?;

        info!(path = %root.display(), "Starting folder scan");

        let mut stats = ScanStats::default();
        let mut books = Vec::new();
        let mut errors = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth)
            .sort_by_file_name();

        for entry in walker.into_iter().filter_entry(|e| self.should_visit(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    let err = ScoutError::from(err);
                    warn!(path = %path, error = %err, "Skipping unreadable entry");
                    stats.errors += 1;
                    errors.push(ScanError {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.dirs_scanned += 1;
                continue;
            }
            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "Skipping non-regular file");
                continue;
            }

            stats.files_seen += 1;
            match DiscoveredBook::from_path(entry.path()) {
                Some(book) => {
                    debug!(path = %book.path.display(), format = %book.format, "Found book");
                    stats.books_found += 1;
                    books.push(book);
                }
                None => {
                    debug!(path = %entry.path().display(), "Skipping unsupported file");
                    stats.files_skipped += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            path = %root.display(),
            books = stats.books_found,
            dirs = stats.dirs_scanned,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            "Scan completed"
        );

        Ok(ScanResult {
            root,
            books,
            stats,
            errors,
        })
    }

    /// The root is always visited; below it hidden entries and excluded
    /// directory names are pruned.
    fn should_visit(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if !self.config.include_hidden && name.starts_with('.') {
            return false;
        }

        if entry.file_type().is_dir()
            && self
                .config
                .exclude_dir_names
                .iter()
                .any(|excluded| excluded.as_str() == name)
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::format::BookFormat;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    fn names(result: &ScanResult) -> Vec<String> {
        result.books.iter().map(|b| b.file_name.clone()).collect()
    }

    #[test]
    fn test_scan_finds_supported_files_recursively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.pdf");
        touch(tmp.path(), "notes.TXT");
        touch(tmp.path(), "cover.jpg");
        touch(tmp.path(), "README");
        touch(tmp.path(), "fiction/Herbert - Dune.epub");
        touch(tmp.path(), "fiction/deep/nested/story.fb2");

        let result = Scanner::new().scan(tmp.path()).unwrap();

        assert_eq!(
            names(&result),
            vec!["a.pdf", "Herbert - Dune.epub", "story.fb2", "notes.TXT"]
        );
        assert_eq!(result.stats.books_found, 4);
        assert_eq!(result.stats.files_seen, 6);
        assert_eq!(result.stats.files_skipped, 2);
        // root, fiction, deep, nested
        assert_eq!(result.stats.dirs_scanned, 4);
        assert!(result.errors.is_empty());

        let txt = result.books.iter().find(|b| b.file_name == "notes.TXT").unwrap();
        assert_eq!(txt.format, BookFormat::Txt);
        assert_eq!(txt.to_book().format, "TXT");
        assert!(txt.path.is_absolute());
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.txt");
        touch(tmp.path(), "one/mid.txt");
        touch(tmp.path(), "one/two/deep.txt");

        let scanner = Scanner::with_config(ScanConfig {
            max_depth: 2,
            ..ScanConfig::default()
        });
        let result = scanner.scan(tmp.path()).unwrap();
        assert_eq!(names(&result), vec!["mid.txt", "top.txt"]);
    }

    #[test]
    fn test_scan_skips_excluded_and_hidden() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".git/objects/pack.txt");
        touch(tmp.path(), ".hidden/secret.pdf");
        touch(tmp.path(), ".dotfile.txt");
        touch(tmp.path(), "visible.rtf");

        let with_hidden = Scanner::new().scan(tmp.path()).unwrap();
        assert_eq!(
            names(&with_hidden),
            vec![".dotfile.txt", "secret.pdf", "visible.rtf"]
        );

        let scanner = Scanner::with_config(ScanConfig {
            include_hidden: false,
            ..ScanConfig::default()
        });
        let without_hidden = scanner.scan(tmp.path()).unwrap();
        assert_eq!(names(&without_hidden), vec!["visible.rtf"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_recorded_and_walk_continues() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "shelf/book.txt");
        std::os::unix::fs::symlink(tmp.path().join("shelf"), tmp.path().join("shelf/loop")).unwrap();
        touch(tmp.path(), "z.txt");

        let scanner = Scanner::with_config(ScanConfig {
            follow_symlinks: true,
            ..ScanConfig::default()
        });
        let result = scanner.scan(tmp.path()).unwrap();

        assert_eq!(names(&result), vec!["book.txt", "z.txt"]);
        assert_eq!(result.stats.errors, 1);
        assert!(result.errors[0].path.ends_with("loop"));
        assert!(result.errors[0].message.starts_with("Unreadable entry"));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let err = Scanner::new().scan(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, ScoutError::FolderNotFound(_)));
    }

    #[test]
    fn test_scan_file_root_fails() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "book.txt");
        let err = Scanner::new().scan(&tmp.path().join("book.txt")).unwrap_err();
        assert!(matches!(err, ScoutError::NotADirectory(_)));
    }

    #[test]
    fn test_empty_folder_yields_no_books() {
        let tmp = TempDir::new().unwrap();
        let result = Scanner::new().scan(tmp.path()).unwrap();
        assert!(result.books.is_empty());
        assert_eq!(result.stats.dirs_scanned, 1);
    }
}
