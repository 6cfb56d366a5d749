//! Reading session for one open book.
//!
//! Opening a book resolves it in the store, loads displayable content and
//! stamps the last-opened time. Positions are line offsets into the
//! extracted text, stored as decimal strings.

use crate::reader::{
    read_document_async, supports_pdf_viewing, supports_text_reading, unsupported_format_message,
};
use alibre_db::{AlibreDb, Book, DbError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load document content";

#[derive(Error, Debug)]
pub enum ReadingError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Book not found in library")]
    BookNotFound,
}

pub type Result<T> = std::result::Result<T, ReadingError>;

/// How to find the book to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRef {
    /// Row id; ids below 1 never match
    Id(i64),
    Path(String),
}

/// What the reader view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum BookContent {
    /// Hand the file to a PDF viewer
    PdfViewer,
    Text(String),
    /// Format has no text extractor; carries the explanation
    Unsupported(String),
    Failed(String),
}

impl BookContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            BookContent::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A window of content lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a> {
    /// Offset of the first line
    pub start: usize,
    /// Offset one past the last line
    pub end: usize,
    pub total_lines: usize,
    pub lines: Vec<&'a str>,
}

impl Page<'_> {
    pub fn is_last(&self) -> bool {
        self.end >= self.total_lines
    }
}

pub struct ReadingSession {
    db: AlibreDb,
    book: Book,
    content: BookContent,
}

impl ReadingSession {
    /// Resolve a book, load its content and mark it opened.
    pub async fn open(db: AlibreDb, book_ref: BookRef) -> Result<Self> {
        let found = match &book_ref {
            BookRef::Id(id) if *id > 0 => db.book_get(*id).await?,
            BookRef::Id(_) => None,
            BookRef::Path(path) => db.book_get_by_file_path(path).await?,
        };
        let mut book = found.ok_or(ReadingError::BookNotFound)?;

        let content = load_content(&book).await;

        let now = AlibreDb::now_millis();
        db.book_touch(book.id, now).await?;
        book.last_opened_at = now;

        info!(id = book.id, format = %book.format, "Opened book");
        Ok(Self { db, book, content })
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn content(&self) -> &BookContent {
        &self.content
    }

    /// Re-extract content from the file.
    pub async fn reload(&mut self) {
        self.content = load_content(&self.book).await;
    }

    /// Persist a reading position and the open timestamp.
    pub async fn save_position(&mut self, position: usize) -> Result<()> {
        let now = AlibreDb::now_millis();
        let position = position.to_string();
        self.db.book_save_position(self.book.id, &position, now).await?;
        self.book.last_read_position = Some(position);
        self.book.last_opened_at = now;
        Ok(())
    }

    /// Saved position; 0 when none was saved or it is not a number.
    pub fn last_position(&self) -> usize {
        self.book
            .last_read_position
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Up to `lines` text lines starting at `start`; `None` unless the
    /// content is text. A start past the end yields an empty page.
    pub fn page(&self, start: usize, lines: usize) -> Option<Page<'_>> {
        let text = self.content.text()?;
        let all: Vec<&str> = text.lines().collect();
        let total_lines = all.len();
        let start = start.min(total_lines);
        let end = start.saturating_add(lines).min(total_lines);
        Some(Page {
            start,
            end,
            total_lines,
            lines: all[start..end].to_vec(),
        })
    }
}

async fn load_content(book: &Book) -> BookContent {
    if supports_pdf_viewing(&book.format) {
        return BookContent::PdfViewer;
    }
    if !supports_text_reading(&book.format) {
        return BookContent::Unsupported(unsupported_format_message(&book.format));
    }

    match read_document_async(PathBuf::from(&book.file_path), book.format.clone()).await {
        Ok(text) => BookContent::Text(text),
        Err(err) => {
            warn!(path = %book.file_path, error = %err, "Failed to load document");
            BookContent::Failed(LOAD_FAILED_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn db_with(book: Book) -> (AlibreDb, i64) {
        let db = AlibreDb::open_in_memory().await.unwrap();
        let id = db.book_insert(&book).await.unwrap();
        (db, id)
    }

    fn text_book(dir: &TempDir, name: &str, content: &str) -> Book {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        Book::new("T", None, path.to_string_lossy(), "TXT")
    }

    #[tokio::test]
    async fn test_open_by_id_loads_text_and_marks_opened() {
        let tmp = TempDir::new().unwrap();
        let (db, id) = db_with(text_book(&tmp, "a.txt", "one\ntwo\nthree")).await;

        let session = ReadingSession::open(db.clone(), BookRef::Id(id)).await.unwrap();
        assert_eq!(session.content(), &BookContent::Text("one\ntwo\nthree".into()));
        assert!(session.book().has_been_opened());

        let stored = db.book_get(id).await.unwrap().unwrap();
        assert_eq!(stored.last_opened_at, session.book().last_opened_at);
    }

    #[tokio::test]
    async fn test_open_by_path_and_missing_book() {
        let tmp = TempDir::new().unwrap();
        let book = text_book(&tmp, "a.txt", "x");
        let path = book.file_path.clone();
        let (db, id) = db_with(book).await;

        let session = ReadingSession::open(db.clone(), BookRef::Path(path)).await.unwrap();
        assert_eq!(session.book().id, id);

        for missing in [BookRef::Id(0), BookRef::Id(id + 100), BookRef::Path("/nope".into())] {
            let err = ReadingSession::open(db.clone(), missing).await.err().unwrap();
            assert!(matches!(err, ReadingError::BookNotFound));
            assert_eq!(err.to_string(), "Book not found in library");
        }
    }

    #[tokio::test]
    async fn test_content_kinds_by_format() {
        let db = AlibreDb::open_in_memory().await.unwrap();
        let pdf = db
            .book_insert(&Book::new("P", None, "/lib/p.pdf", "PDF"))
            .await
            .unwrap();
        let epub = db
            .book_insert(&Book::new("E", None, "/lib/e.epub", "EPUB"))
            .await
            .unwrap();
        let gone = db
            .book_insert(&Book::new("G", None, "/lib/gone.txt", "TXT"))
            .await
            .unwrap();

        let session = ReadingSession::open(db.clone(), BookRef::Id(pdf)).await.unwrap();
        assert_eq!(session.content(), &BookContent::PdfViewer);

        let session = ReadingSession::open(db.clone(), BookRef::Id(epub)).await.unwrap();
        assert_eq!(
            session.content(),
            &BookContent::Unsupported(unsupported_format_message("EPUB"))
        );

        let session = ReadingSession::open(db.clone(), BookRef::Id(gone)).await.unwrap();
        assert_eq!(
            session.content(),
            &BookContent::Failed(LOAD_FAILED_MESSAGE.to_string())
        );
        assert!(session.page(0, 10).is_none());
    }

    #[tokio::test]
    async fn test_positions_persist() {
        let tmp = TempDir::new().unwrap();
        let (db, id) = db_with(text_book(&tmp, "a.txt", "x")).await;

        let mut session = ReadingSession::open(db.clone(), BookRef::Id(id)).await.unwrap();
        assert_eq!(session.last_position(), 0);

        session.save_position(42).await.unwrap();
        assert_eq!(session.last_position(), 42);

        let reopened = ReadingSession::open(db.clone(), BookRef::Id(id)).await.unwrap();
        assert_eq!(reopened.last_position(), 42);
        assert_eq!(
            db.book_get(id).await.unwrap().unwrap().last_read_position.as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn test_unparsable_position_reads_as_zero() {
        let tmp = TempDir::new().unwrap();
        let mut book = text_book(&tmp, "a.txt", "x");
        book.last_read_position = Some("chapter-3".into());
        let (db, id) = db_with(book).await;

        let session = ReadingSession::open(db, BookRef::Id(id)).await.unwrap();
        assert_eq!(session.last_position(), 0);
    }

    #[tokio::test]
    async fn test_paging_and_reload() {
        let tmp = TempDir::new().unwrap();
        let book = text_book(&tmp, "a.txt", "l0\nl1\nl2\nl3\nl4");
        let path = PathBuf::from(&book.file_path);
        let (db, id) = db_with(book).await;

        let mut session = ReadingSession::open(db, BookRef::Id(id)).await.unwrap();
        let page = session.page(1, 2).unwrap();
        assert_eq!(page.lines, vec!["l1", "l2"]);
        assert_eq!((page.start, page.end, page.total_lines), (1, 3, 5));
        assert!(!page.is_last());

        let tail = session.page(4, 10).unwrap();
        assert_eq!(tail.lines, vec!["l4"]);
        assert!(tail.is_last());

        let past = session.page(99, 10).unwrap();
        assert!(past.lines.is_empty());
        assert_eq!(past.start, 5);

        fs::write(&path, "changed").unwrap();
        session.reload().await;
        assert_eq!(session.content().text(), Some("changed"));
    }
}
