//! Database schema creation.
//!
//! All CREATE TABLE statements live here. There are no migrations: a
//! database stamped with a different schema version is wiped and rebuilt.

use crate::error::Result;
use crate::AlibreDb;
use tracing::{info, warn};

/// Stored in `PRAGMA user_version`.
pub(crate) const SCHEMA_VERSION: i64 = 1;

impl AlibreDb {
    /// Ensure all tables exist at the current schema version.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await?;

        if version != 0 && version != SCHEMA_VERSION {
            warn!(
                found = version,
                expected = SCHEMA_VERSION,
                "Schema version mismatch, rebuilding library tables"
            );
            self.drop_tables().await?;
        }

        self.create_tables().await?;

        // PRAGMA does not accept bound parameters
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(&self.pool)
            .await?;

        info!("Database schema verified");
        Ok(())
    }

    async fn drop_tables(&self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS books")
            .execute(&self.pool)
            .await?;
        sqlx::query("DROP TABLE IF EXISTS library_folders")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT,
                file_path TEXT NOT NULL UNIQUE,
                format TEXT NOT NULL,
                cover_image_path TEXT,
                last_read_position TEXT,
                total_pages INTEGER,
                last_opened_at INTEGER NOT NULL DEFAULT 0
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS library_folders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT NOT NULL UNIQUE
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_last_opened ON books(last_opened_at)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_title ON books(title)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
