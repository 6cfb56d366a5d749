//! Library store for Alibre
//!
//! This crate owns every database operation on the two record types
//! (books and library folders). The CLI and the library services go through
//! [`AlibreDb`]; nothing else talks to SQLite directly.
//!
//! # Usage
//!
//! ```rust,ignore
//! use alibre_db::{AlibreDb, Book, Result};
//!
//! let db = AlibreDb::open("~/.alibre/library.sqlite3").await?;
//!
//! let id = db.book_insert(&Book::new("Dune", None, "/books/Dune.epub", "EPUB")).await?;
//! let recent = db.book_list_all().await?;
//! ```

mod error;
mod schema;
mod types;

// Method implementations organized by record type
mod books;
mod folders;

pub use books::escape_like;
pub use error::{DbError, Result};
pub use types::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Library database.
///
/// Cloning is cheap: clones share the pool and the change feed.
#[derive(Clone)]
pub struct AlibreDb {
    pool: SqlitePool,
    changes: Arc<watch::Sender<u64>>,
}

impl AlibreDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self::from_pool(pool);
        db.ensure_schema().await?;

        info!(path = %path.display(), "Database opened");

        Ok(db)
    }

    /// Open an existing database (fails if not exists).
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DbError::not_found(format!(
                "Database not found: {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new().filename(path);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self::from_pool(pool);
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` is a separate database, so the
    /// pool is pinned to a single connection that never expires.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self::from_pool(pool);
        db.ensure_schema().await?;
        Ok(db)
    }

    fn from_pool(pool: SqlitePool) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            changes: Arc::new(changes),
        }
    }

    /// Get the underlying connection pool.
    ///
    /// Prefer using the typed methods instead.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Subscribe to store changes.
    ///
    /// The value is a revision counter bumped after every successful
    /// mutation; a view re-runs its query whenever `changed()` resolves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Current store revision.
    pub fn revision(&self) -> u64 {
        *self.changes.borrow()
    }

    pub(crate) fn notify_changed(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl AlibreDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Convert milliseconds to DateTime.
    pub fn millis_to_datetime(millis: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
    }
}
