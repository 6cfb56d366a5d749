//! Book record operations

use crate::error::{DbError, Result};
use crate::types::*;
use crate::AlibreDb;
use sqlx::Row;

const BOOK_COLUMNS: &str = "id, title, author, file_path, format, cover_image_path, \
     last_read_position, total_pages, last_opened_at";

impl AlibreDb {
    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert a book, replacing any row with the same id or file path.
    ///
    /// A book with `id == 0` gets a fresh id. Returns the row id.
    pub async fn book_insert(&self, book: &Book) -> Result<i64> {
        let id = (book.id > 0).then_some(book.id);

        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO books (
                id, title, author, file_path, format, cover_image_path,
                last_read_position, total_pages, last_opened_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.file_path)
        .bind(&book.format)
        .bind(&book.cover_image_path)
        .bind(&book.last_read_position)
        .bind(book.total_pages)
        .bind(book.last_opened_at)
        .execute(&self.pool)
        .await?;

        self.notify_changed();
        Ok(result.last_insert_rowid())
    }

    /// Update every mutable column of an existing book.
    pub async fn book_update(&self, book: &Book) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?,
                author = ?,
                file_path = ?,
                format = ?,
                cover_image_path = ?,
                last_read_position = ?,
                total_pages = ?,
                last_opened_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.file_path)
        .bind(&book.format)
        .bind(&book.cover_image_path)
        .bind(&book.last_read_position)
        .bind(book.total_pages)
        .bind(book.last_opened_at)
        .bind(book.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("Book {}", book.id)));
        }

        self.notify_changed();
        Ok(())
    }

    /// Delete a book record (the file itself is untouched).
    pub async fn book_delete(&self, book: &Book) -> Result<()> {
        self.book_delete_by_id(book.id).await.map(|_| ())
    }

    /// Delete a book by id. Returns whether a row was removed.
    pub async fn book_delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.notify_changed();
        }
        Ok(deleted)
    }

    /// Set the last-opened timestamp.
    pub async fn book_touch(&self, id: i64, opened_at: i64) -> Result<()> {
        let result = sqlx::query("UPDATE books SET last_opened_at = ? WHERE id = ?")
            .bind(opened_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("Book {}", id)));
        }

        self.notify_changed();
        Ok(())
    }

    /// Record a reading position together with the open timestamp.
    pub async fn book_save_position(&self, id: i64, position: &str, opened_at: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE books SET last_read_position = ?, last_opened_at = ? WHERE id = ?",
        )
        .bind(position)
        .bind(opened_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("Book {}", id)));
        }

        self.notify_changed();
        Ok(())
    }

    /// Delete every book whose path is not in `valid_paths`.
    ///
    /// An empty list deletes all books. Returns the number removed.
    pub async fn book_delete_not_in_paths(&self, valid_paths: &[String]) -> Result<u64> {
        let paths_json = serde_json::to_string(valid_paths)?;

        let result = sqlx::query(
            "DELETE FROM books WHERE file_path NOT IN (SELECT value FROM json_each(?))",
        )
        .bind(paths_json)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            self.notify_changed();
        }
        Ok(deleted)
    }

    /// Delete every book stored under a folder.
    pub async fn book_delete_by_folder(&self, folder_path: &str) -> Result<u64> {
        let prefix = folder_prefix(folder_path);
        let result =
            sqlx::query("DELETE FROM books WHERE substr(file_path, 1, length(?)) = ?")
                .bind(&prefix)
                .bind(&prefix)
                .execute(&self.pool)
                .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            self.notify_changed();
        }
        Ok(deleted)
    }

    /// Delete all books.
    pub async fn book_delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM books")
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            self.notify_changed();
        }
        Ok(deleted)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a book by id
    pub async fn book_get(&self, id: i64) -> Result<Option<Book>> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| self.row_to_book(&row)).transpose()
    }

    /// Get a book by its file path
    pub async fn book_get_by_file_path(&self, file_path: &str) -> Result<Option<Book>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE file_path = ? LIMIT 1"
        ))
        .bind(file_path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| self.row_to_book(&row)).transpose()
    }

    /// All books, most recently opened first.
    pub async fn book_list_all(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY last_opened_at DESC, title ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_book(row)).collect()
    }

    /// Books whose title or author matches a LIKE pattern, by title.
    ///
    /// Backslash is the escape character, see [`escape_like`].
    pub async fn book_search(&self, pattern: &str) -> Result<Vec<Book>> {
        let rows = sqlx::query(&format!(
            r"SELECT {BOOK_COLUMNS} FROM books WHERE title LIKE ? ESCAPE '\' OR author LIKE ? ESCAPE '\' ORDER BY title ASC"
        ))
        .bind(pattern)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_book(row)).collect()
    }

    /// Books stored under a folder.
    pub async fn book_list_by_folder(&self, folder_path: &str) -> Result<Vec<Book>> {
        let prefix = folder_prefix(folder_path);
        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE substr(file_path, 1, length(?)) = ? ORDER BY file_path"
        ))
        .bind(&prefix)
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_book(row)).collect()
    }

    /// Every recorded file path.
    pub async fn book_all_file_paths(&self) -> Result<Vec<String>> {
        let paths: Vec<String> = sqlx::query_scalar("SELECT file_path FROM books ORDER BY file_path")
            .fetch_all(&self.pool)
            .await?;
        Ok(paths)
    }

    /// Library-wide counts.
    pub async fn stats(&self) -> Result<LibraryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM library_folders) as total_folders,
                COUNT(*) as total_books,
                COALESCE(SUM(CASE WHEN last_opened_at > 0 THEN 1 ELSE 0 END), 0) as books_opened
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let format_rows = sqlx::query(
            "SELECT format, COUNT(*) as book_count FROM books GROUP BY format ORDER BY book_count DESC, format",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(LibraryStats {
            total_folders: row.get::<i64, _>("total_folders") as u64,
            total_books: row.get::<i64, _>("total_books") as u64,
            books_opened: row.get::<i64, _>("books_opened") as u64,
            books_by_format: format_rows
                .iter()
                .map(|r| FormatCount {
                    format: r.get("format"),
                    count: r.get::<i64, _>("book_count") as u64,
                })
                .collect(),
        })
    }

    fn row_to_book(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Book> {
        Ok(Book {
            id: row.get("id"),
            title: row.get("title"),
            author: row.get("author"),
            file_path: row.get("file_path"),
            format: row.get("format"),
            cover_image_path: row.get("cover_image_path"),
            last_read_position: row.get("last_read_position"),
            total_pages: row.get("total_pages"),
            last_opened_at: row.get("last_opened_at"),
        })
    }
}

/// Prefix shared by every path strictly below `folder_path`.
///
/// Compared with `substr` so matching is exact and case-sensitive.
fn folder_prefix(folder_path: &str) -> String {
    let trimmed = folder_path.trim_end_matches(['/', '\\']);
    let separator = if folder_path.contains('\\') && !folder_path.contains('/') {
        '\\'
    } else {
        '/'
    };
    format!("{trimmed}{separator}")
}

/// Escape `%`, `_` and `\` so a user query matches them literally.
pub fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
