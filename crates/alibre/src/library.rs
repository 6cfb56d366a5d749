//! Library service
//!
//! Ties the scanner to the store: folders are registered only after an
//! access check, scans run on the blocking pool, and discovered files are
//! recorded once per path.
//!
//! # Rescan
//!
//! [`Library::rescan_all`] walks every folder in full. Records for files
//! that vanished are deleted, new files are inserted and existing records
//! keep their reading state. A folder whose grant was revoked keeps its
//! books and is reported in [`RescanReport::unavailable`].

use crate::scout::{
    check_access, ScanConfig, ScanError, ScanResult, ScanStats, Scanner, ScoutError,
};
use alibre_db::{escape_like, AlibreDb, Book, DbError, LibraryFolder};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

/// Library service error type
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Scout(#[from] ScoutError),

    #[error("Folder is not in the library: {0}")]
    FolderNotRegistered(String),

    #[error("Background scan failed: {0}")]
    Background(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Outcome of registering a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddFolderOutcome {
    Added(LibraryFolder),
    AlreadyPresent(LibraryFolder),
}

impl AddFolderOutcome {
    pub fn folder(&self) -> &LibraryFolder {
        match self {
            AddFolderOutcome::Added(folder) | AddFolderOutcome::AlreadyPresent(folder) => folder,
        }
    }

    pub fn into_folder(self) -> LibraryFolder {
        match self {
            AddFolderOutcome::Added(folder) | AddFolderOutcome::AlreadyPresent(folder) => folder,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, AddFolderOutcome::Added(_))
    }
}

/// Books recorded by [`Library::add_books`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddBooksOutcome {
    /// Newly inserted records, ids assigned
    pub inserted: Vec<Book>,
    /// Candidates skipped because their path was already recorded
    pub already_known: usize,
}

/// One folder scanned and recorded.
#[derive(Debug, Clone, Serialize)]
pub struct FolderScan {
    pub folder: LibraryFolder,
    pub stats: ScanStats,
    pub errors: Vec<ScanError>,
    pub books_added: usize,
    pub books_known: usize,
}

/// A folder skipped by a rescan because it is no longer accessible.
#[derive(Debug, Clone, Serialize)]
pub struct UnavailableFolder {
    pub path: String,
    pub reason: String,
    /// Existing books kept for this folder
    pub books_retained: usize,
}

/// Summary of [`Library::rescan_all`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RescanReport {
    pub folders_scanned: usize,
    pub unavailable: Vec<UnavailableFolder>,
    pub books_added: usize,
    pub books_removed: u64,
    pub books_total: u64,
    pub errors: Vec<ScanError>,
}

/// The e-book library: folders, their books, and scanning.
#[derive(Clone)]
pub struct Library {
    db: AlibreDb,
    scan_config: ScanConfig,
}

impl Library {
    pub fn new(db: AlibreDb) -> Self {
        Self::with_scan_config(db, ScanConfig::default())
    }

    pub fn with_scan_config(db: AlibreDb, scan_config: ScanConfig) -> Self {
        Self { db, scan_config }
    }

    pub fn db(&self) -> &AlibreDb {
        &self.db
    }

    /// Change feed of the underlying store.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.db.subscribe()
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Register a folder after checking it can be listed.
    ///
    /// The folder is stored by canonical path.
    pub async fn add_folder(&self, path: &Path) -> Result<AddFolderOutcome> {
        check_access(path).into_result(path)?;
        let canonical = path.canonicalize().map_err(ScoutError::from)?;
        let canonical = canonical.to_string_lossy().into_owned();

        if let Some(existing) = self.db.folder_get_by_path(&canonical).await? {
            return Ok(AddFolderOutcome::AlreadyPresent(existing));
        }

        let mut folder = LibraryFolder::new(canonical);
        match self.db.folder_add(&folder).await? {
            Some(id) => {
                folder.id = id;
                info!(path = %folder.path, id, "Added library folder");
                Ok(AddFolderOutcome::Added(folder))
            }
            None => {
                let existing = self
                    .db
                    .folder_get_by_path(&folder.path)
                    .await?
                    .ok_or_else(|| LibraryError::FolderNotRegistered(folder.path.clone()))?;
                Ok(AddFolderOutcome::AlreadyPresent(existing))
            }
        }
    }

    /// Look up a registered folder; tries the canonical form of `path`
    /// first, then `path` as given (the folder may no longer exist).
    pub async fn folder_by_path(&self, path: &Path) -> Result<Option<LibraryFolder>> {
        if let Ok(canonical) = path.canonicalize() {
            let canonical = canonical.to_string_lossy();
            if let Some(folder) = self.db.folder_get_by_path(&canonical).await? {
                return Ok(Some(folder));
            }
        }
        Ok(self.db.folder_get_by_path(&path.to_string_lossy()).await?)
    }

    pub async fn folders(&self) -> Result<Vec<LibraryFolder>> {
        Ok(self.db.folder_list_all().await?)
    }

    /// Remove a folder and every book under it. Returns the books removed.
    pub async fn remove_folder(&self, folder: &LibraryFolder) -> Result<u64> {
        if !self.db.folder_remove(folder).await? {
            return Err(LibraryError::FolderNotRegistered(folder.path.clone()));
        }
        let removed_books = self.db.book_delete_by_folder(&folder.path).await?;
        info!(path = %folder.path, removed_books, "Removed library folder");
        Ok(removed_books)
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Scan one folder and record the books not seen before.
    pub async fn scan_folder(&self, folder: &LibraryFolder) -> Result<FolderScan> {
        let result = self.scan_path(PathBuf::from(&folder.path)).await?;
        let added = self.add_books(result.to_books()).await?;

        Ok(FolderScan {
            folder: folder.clone(),
            stats: result.stats,
            errors: result.errors,
            books_added: added.inserted.len(),
            books_known: added.already_known,
        })
    }

    /// Insert the books whose path is not yet recorded.
    pub async fn add_books(&self, books: Vec<Book>) -> Result<AddBooksOutcome> {
        let mut known: HashSet<String> = self.db.book_all_file_paths().await?.into_iter().collect();
        let mut outcome = AddBooksOutcome::default();

        for mut book in books {
            if !known.insert(book.file_path.clone()) {
                outcome.already_known += 1;
                continue;
            }
            book.id = self.db.book_insert(&book).await?;
            outcome.inserted.push(book);
        }

        Ok(outcome)
    }

    /// Register a folder and scan it.
    pub async fn import_folder(&self, path: &Path) -> Result<(AddFolderOutcome, FolderScan)> {
        let outcome = self.add_folder(path).await?;
        let scan = self.scan_folder(outcome.folder()).await?;
        Ok((outcome, scan))
    }

    /// Fully rescan every registered folder and reconcile the book table.
    pub async fn rescan_all(&self) -> Result<RescanReport> {
        let mut report = RescanReport::default();
        let mut keep_paths: Vec<String> = Vec::new();
        let mut discovered: Vec<Book> = Vec::new();

        for folder in self.db.folder_list_all().await? {
            match self.scan_path(PathBuf::from(&folder.path)).await {
                Ok(result) => {
                    report.folders_scanned += 1;
                    // Entries that could not be read may still hold books.
                    for error in &result.errors {
                        keep_paths.extend(self.recorded_paths_under(&error.path).await?);
                    }
                    keep_paths.extend(result.books.iter().map(|b| b.file_path()));
                    discovered.extend(result.to_books());
                    report.errors.extend(result.errors);
                }
                Err(LibraryError::Scout(err)) => {
                    let retained = self.db.book_list_by_folder(&folder.path).await?;
                    warn!(
                        path = %folder.path,
                        error = %err,
                        retained = retained.len(),
                        "Library folder unavailable, keeping its books"
                    );
                    report.unavailable.push(UnavailableFolder {
                        path: folder.path.clone(),
                        reason: err.to_string(),
                        books_retained: retained.len(),
                    });
                    keep_paths.extend(retained.into_iter().map(|b| b.file_path));
                }
                Err(err) => return Err(err),
            }
        }

        report.books_removed = self.db.book_delete_not_in_paths(&keep_paths).await?;
        report.books_added = self.add_books(discovered).await?.inserted.len();
        report.books_total = self.db.stats().await?.total_books;

        info!(
            folders = report.folders_scanned,
            unavailable = report.unavailable.len(),
            added = report.books_added,
            removed = report.books_removed,
            "Rescan completed"
        );
        Ok(report)
    }

    async fn scan_path(&self, root: PathBuf) -> Result<ScanResult> {
        let scanner = Scanner::with_config(self.scan_config.clone());
        let result = tokio::task::spawn_blocking(move || scanner.scan(&root))
            .await
            .map_err(|err| LibraryError::Background(err.to_string()))??;
        Ok(result)
    }

    /// Recorded paths equal to `path` or below it.
    async fn recorded_paths_under(&self, path: &str) -> Result<Vec<String>> {
        let mut paths: Vec<String> = self
            .db
            .book_list_by_folder(path)
            .await?
            .into_iter()
            .map(|b| b.file_path)
            .collect();
        if let Some(book) = self.db.book_get_by_file_path(path).await? {
            paths.push(book.file_path);
        }
        Ok(paths)
    }

    // ========================================================================
    // Books
    // ========================================================================

    /// All books, most recently opened first.
    pub async fn books(&self) -> Result<Vec<Book>> {
        Ok(self.db.book_list_all().await?)
    }

    /// Books whose title or author contains `query` literally.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let pattern = format!("%{}%", escape_like(query));
        Ok(self.db.book_search(&pattern).await?)
    }

    pub async fn book(&self, id: i64) -> Result<Option<Book>> {
        Ok(self.db.book_get(id).await?)
    }

    /// Forget a book. The file itself is left alone.
    pub async fn delete_book(&self, book: &Book) -> Result<()> {
        Ok(self.db.book_delete(book).await?)
    }

    /// Mark a book as opened now; returns the timestamp.
    pub async fn touch_book(&self, book: &Book) -> Result<i64> {
        let now = AlibreDb::now_millis();
        self.db.book_touch(book.id, now).await?;
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn library() -> Library {
        Library::new(AlibreDb::open_in_memory().await.unwrap())
    }

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "content").unwrap();
        path
    }

    fn canonical(path: &Path) -> String {
        path.canonicalize().unwrap().to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_add_folder_is_idempotent() {
        let lib = library().await;
        let tmp = TempDir::new().unwrap();

        let first = lib.add_folder(tmp.path()).await.unwrap();
        assert!(first.is_new());
        assert_eq!(first.folder().path, canonical(tmp.path()));

        let second = lib.add_folder(tmp.path()).await.unwrap();
        assert!(!second.is_new());
        assert_eq!(second.folder().id, first.folder().id);
        assert_eq!(lib.folders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_inaccessible_folder_fails() {
        let lib = library().await;
        let tmp = TempDir::new().unwrap();
        let file = touch(tmp.path(), "book.txt");

        let err = lib.add_folder(&tmp.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, LibraryError::Scout(ScoutError::FolderNotFound(_))));

        let err = lib.add_folder(&file).await.unwrap_err();
        assert!(matches!(err, LibraryError::Scout(ScoutError::NotADirectory(_))));
        assert!(lib.folders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_folder_records_books_once() {
        let lib = library().await;
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Frank Herbert - Dune.epub");
        touch(tmp.path(), "sub/notes.txt");
        touch(tmp.path(), "cover.jpg");

        let (outcome, scan) = lib.import_folder(tmp.path()).await.unwrap();
        assert!(outcome.is_new());
        assert_eq!(scan.books_added, 2);
        assert_eq!(scan.books_known, 0);
        assert_eq!(scan.stats.files_skipped, 1);

        let again = lib.scan_folder(outcome.folder()).await.unwrap();
        assert_eq!(again.books_added, 0);
        assert_eq!(again.books_known, 2);

        let books = lib.books().await.unwrap();
        assert_eq!(books.len(), 2);
        let dune = books.iter().find(|b| b.format == "EPUB").unwrap();
        assert_eq!(dune.author.as_deref(), Some("Frank Herbert"));
        assert!(dune.id > 0);
    }

    #[tokio::test]
    async fn test_add_books_dedupes_within_batch() {
        let lib = library().await;
        let book = Book::new("A", None, "/lib/a.txt", "TXT");
        let outcome = lib
            .add_books(vec![book.clone(), book.clone()])
            .await
            .unwrap();
        assert_eq!(outcome.inserted.len(), 1);
        assert_eq!(outcome.already_known, 1);
    }

    #[tokio::test]
    async fn test_remove_folder_removes_its_books_only() {
        let lib = library().await;
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        touch(a.path(), "one.txt");
        touch(b.path(), "two.txt");

        let (folder_a, _) = lib.import_folder(a.path()).await.unwrap();
        lib.import_folder(b.path()).await.unwrap();

        let removed = lib.remove_folder(folder_a.folder()).await.unwrap();
        assert_eq!(removed, 1);

        let books = lib.books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert!(books[0].file_path.ends_with("two.txt"));
        assert_eq!(lib.folders().await.unwrap().len(), 1);

        let err = lib.remove_folder(folder_a.folder()).await.unwrap_err();
        assert!(matches!(err, LibraryError::FolderNotRegistered(_)));
    }

    #[tokio::test]
    async fn test_rescan_reconciles_and_keeps_reading_state() {
        let lib = library().await;
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "keep.txt");
        let gone = touch(tmp.path(), "gone.txt");
        lib.import_folder(tmp.path()).await.unwrap();

        let keep_path = canonical(&tmp.path().join("keep.txt"));
        let keep = lib.db().book_get_by_file_path(&keep_path).await.unwrap().unwrap();
        lib.db().book_save_position(keep.id, "12", 1_000).await.unwrap();

        fs::remove_file(gone).unwrap();
        touch(tmp.path(), "new.rtf");

        let report = lib.rescan_all().await.unwrap();
        assert_eq!(report.folders_scanned, 1);
        assert_eq!(report.books_removed, 1);
        assert_eq!(report.books_added, 1);
        assert_eq!(report.books_total, 2);
        assert!(report.unavailable.is_empty());

        let kept = lib.book(keep.id).await.unwrap().unwrap();
        assert_eq!(kept.last_read_position.as_deref(), Some("12"));
        assert_eq!(kept.last_opened_at, 1_000);
    }

    #[tokio::test]
    async fn test_rescan_keeps_books_of_revoked_folder() {
        let lib = library().await;
        let outer = TempDir::new().unwrap();
        let folder = outer.path().join("shelf");
        touch(&folder, "a.txt");
        touch(&folder, "b.pdf");
        lib.import_folder(&folder).await.unwrap();

        fs::remove_dir_all(&folder).unwrap();

        let report = lib.rescan_all().await.unwrap();
        assert_eq!(report.folders_scanned, 0);
        assert_eq!(report.unavailable.len(), 1);
        assert_eq!(report.unavailable[0].books_retained, 2);
        assert_eq!(report.books_removed, 0);
        assert_eq!(lib.books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_author() {
        let lib = library().await;
        lib.add_books(vec![
            Book::new("Dune", Some("Frank Herbert".into()), "/lib/dune.epub", "EPUB"),
            Book::new("Emma", Some("Jane Austen".into()), "/lib/emma.txt", "TXT"),
        ])
        .await
        .unwrap();

        let by_title = lib.search("un").await.unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].title, "Dune");

        let by_author = lib.search("austen").await.unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].title, "Emma");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let lib = library().await;
        lib.add_books(vec![
            Book::new("100% Done", None, "/lib/done.txt", "TXT"),
            Book::new("snake_case", None, "/lib/snake.txt", "TXT"),
            Book::new("Plain", None, "/lib/plain.txt", "TXT"),
        ])
        .await
        .unwrap();

        let titles = |books: Vec<Book>| books.into_iter().map(|b| b.title).collect::<Vec<_>>();
        assert_eq!(titles(lib.search("_").await.unwrap()), vec!["snake_case"]);
        assert_eq!(titles(lib.search("%").await.unwrap()), vec!["100% Done"]);
        assert_eq!(lib.search("").await.unwrap().len(), 3);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_remove_folder_spares_folder_differing_in_case() {
        let lib = library().await;
        let outer = TempDir::new().unwrap();
        touch(&outer.path().join("books"), "a.txt");
        touch(&outer.path().join("Books"), "b.txt");

        let (lower, _) = lib.import_folder(&outer.path().join("books")).await.unwrap();
        lib.import_folder(&outer.path().join("Books")).await.unwrap();

        assert_eq!(lib.remove_folder(lower.folder()).await.unwrap(), 1);
        let paths: Vec<String> = lib.books().await.unwrap().into_iter().map(|b| b.file_path).collect();
        assert_eq!(paths, vec![canonical(&outer.path().join("Books/b.txt"))]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rescan_keeps_books_below_unreadable_entry() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "shelf/book.txt");
        let gone = touch(tmp.path(), "shelf/gone.txt");
        // A followed link back to its parent is reported as a walk error
        std::os::unix::fs::symlink(tmp.path().join("shelf"), tmp.path().join("shelf/loop")).unwrap();

        let lib = Library::with_scan_config(
            AlibreDb::open_in_memory().await.unwrap(),
            ScanConfig {
                follow_symlinks: true,
                ..ScanConfig::default()
            },
        );
        let (_, scan) = lib.import_folder(tmp.path()).await.unwrap();
        assert_eq!(scan.books_added, 2);
        assert_eq!(scan.errors.len(), 1);

        let loop_path = format!("{}/loop", canonical(&tmp.path().join("shelf")));
        assert_eq!(scan.errors[0].path, loop_path);
        let below = lib
            .add_books(vec![Book::new("old", None, format!("{loop_path}/old.txt"), "TXT")])
            .await
            .unwrap();
        let below = below.inserted[0].clone();

        fs::remove_file(gone).unwrap();
        let report = lib.rescan_all().await.unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.books_removed, 1);
        assert_eq!(report.books_added, 0);
        assert_eq!(report.books_total, 2);
        assert!(lib.book(below.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_touch_and_delete_notify_subscribers() {
        let lib = library().await;
        let outcome = lib
            .add_books(vec![Book::new("A", None, "/lib/a.txt", "TXT")])
            .await
            .unwrap();
        let book = outcome.inserted[0].clone();

        let mut changes = lib.subscribe();
        let _ = changes.borrow_and_update();

        let at = lib.touch_book(&book).await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert_eq!(lib.book(book.id).await.unwrap().unwrap().last_opened_at, at);

        let _ = changes.borrow_and_update();
        lib.delete_book(&book).await.unwrap();
        assert!(changes.has_changed().unwrap());
        assert!(lib.book(book.id).await.unwrap().is_none());
    }
}
