//! Books commands - list, search, inspect and forget recorded books

use crate::cli::context::AppContext;
use crate::cli::error::HelpfulError;
use crate::cli::output::{color_for_format, format_opened, print_json, print_table_colored, truncate};
use alibre::reader::{supports_pdf_viewing, supports_text_reading};
use alibre_db::Book;
use clap::Subcommand;
use comfy_table::Color;
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum BooksAction {
    /// List books, most recently opened first
    List {
        /// Maximum books to display
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find books whose title or author contains QUERY
    Search {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one book
    Show {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a book from the library (the file is kept)
    Remove {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl BooksAction {
    pub fn wants_json(&self) -> bool {
        match self {
            BooksAction::List { json, .. }
            | BooksAction::Search { json, .. }
            | BooksAction::Show { json, .. }
            | BooksAction::Remove { json, .. } => *json,
        }
    }
}

#[derive(Debug, Serialize)]
struct BooksOutput {
    total: usize,
    books: Vec<Book>,
}

#[derive(Debug, Serialize)]
struct BookDetail<'a> {
    #[serde(flatten)]
    book: &'a Book,
    file_exists: bool,
    readable_as_text: bool,
}

#[derive(Debug, Serialize)]
struct RemoveOutput {
    removed: Book,
}

pub async fn run(action: BooksAction, ctx: &AppContext) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;

    match action {
        BooksAction::List { limit, json } => {
            let books = library.books().await?;
            let total = books.len();
            let books = match limit {
                Some(limit) => books.into_iter().take(limit).collect(),
                None => books,
            };
            print_books(BooksOutput { total, books }, json, "No books yet. Try: alibre folder add <PATH>")
        }
        BooksAction::Search { query, json } => {
            let books = library.search(&query).await?;
            let no_match = format!("No books match '{}'", query);
            print_books(BooksOutput { total: books.len(), books }, json, &no_match)
        }
        BooksAction::Show { id, json } => {
            let book = library
                .book(id)
                .await?
                .ok_or_else(|| HelpfulError::book_not_found(id))?;
            let detail = BookDetail {
                book: &book,
                file_exists: std::path::Path::new(&book.file_path).is_file(),
                readable_as_text: supports_text_reading(&book.format),
            };
            if json {
                return print_json(&detail);
            }
            print_detail(&detail);
            Ok(())
        }
        BooksAction::Remove { id, json } => {
            let book = library
                .book(id)
                .await?
                .ok_or_else(|| HelpfulError::book_not_found(id))?;
            library.delete_book(&book).await?;
            if json {
                return print_json(&RemoveOutput { removed: book });
            }
            println!("Removed '{}' from the library (file kept: {})", book.title, book.file_path);
            Ok(())
        }
    }
}

fn print_books(output: BooksOutput, json: bool, empty_message: &str) -> anyhow::Result<()> {
    if json {
        return print_json(&output);
    }
    if output.books.is_empty() {
        println!("{}", empty_message);
        return Ok(());
    }

    let shown = output.books.len();
    let rows = output
        .books
        .into_iter()
        .map(|book| {
            vec![
                (book.id.to_string(), None),
                (truncate(&book.title, 48), None),
                (book.author.unwrap_or_default(), None),
                (book.format.clone(), Some(color_for_format(&book.format))),
                (
                    format_opened(book.last_opened_at),
                    (book.last_opened_at == 0).then_some(Color::DarkGrey),
                ),
            ]
        })
        .collect();
    print_table_colored(&["ID", "TITLE", "AUTHOR", "FORMAT", "OPENED"], rows);
    if shown < output.total {
        println!("Showing {} of {} books", shown, output.total);
    }
    Ok(())
}

fn print_detail(detail: &BookDetail<'_>) {
    let book = detail.book;
    println!("{}", book.title);
    println!("  ID:       {}", book.id);
    println!("  Author:   {}", book.author.as_deref().unwrap_or("(unknown)"));
    println!("  Format:   {}", book.format);
    println!(
        "  File:     {}{}",
        book.file_path,
        if detail.file_exists { "" } else { " (missing)" }
    );
    println!("  Opened:   {}", format_opened(book.last_opened_at));
    if let Some(position) = &book.last_read_position {
        println!("  Position: line {}", position);
    }
    let reading = if detail.readable_as_text {
        format!("alibre read {}", book.id)
    } else if supports_pdf_viewing(&book.format) {
        "open in a PDF viewer".to_string()
    } else {
        "not available as text".to_string()
    };
    println!("  Read:     {}", reading);
}
