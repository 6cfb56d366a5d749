//! Library folder operations

use crate::error::Result;
use crate::types::*;
use crate::AlibreDb;
use sqlx::Row;

impl AlibreDb {
    /// Record a library folder.
    ///
    /// Returns the new row id, or `None` if the path is already recorded.
    pub async fn folder_add(&self, folder: &LibraryFolder) -> Result<Option<i64>> {
        let result = sqlx::query("INSERT OR IGNORE INTO library_folders (path) VALUES (?)")
            .bind(&folder.path)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.notify_changed();
        Ok(Some(result.last_insert_rowid()))
    }

    /// Remove a library folder record (its books are left alone).
    pub async fn folder_remove(&self, folder: &LibraryFolder) -> Result<bool> {
        let result = sqlx::query("DELETE FROM library_folders WHERE id = ? OR path = ?")
            .bind(folder.id)
            .bind(&folder.path)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            self.notify_changed();
        }
        Ok(removed)
    }

    /// All library folders by path.
    pub async fn folder_list_all(&self) -> Result<Vec<LibraryFolder>> {
        let rows = sqlx::query("SELECT id, path FROM library_folders ORDER BY path ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(row_to_folder).collect())
    }

    /// Get a library folder by path
    pub async fn folder_get_by_path(&self, path: &str) -> Result<Option<LibraryFolder>> {
        let row = sqlx::query("SELECT id, path FROM library_folders WHERE path = ? LIMIT 1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_folder))
    }
}

fn row_to_folder(row: &sqlx::sqlite::SqliteRow) -> LibraryFolder {
    LibraryFolder {
        id: row.get("id"),
        path: row.get("path"),
    }
}
