//! Read command - page through a book as plain text
//!
//! Prints one page starting at the saved position (or `--from`) and saves
//! the position after it, so repeated `alibre read <ID>` walks the book.

use crate::cli::context::AppContext;
use crate::cli::error::HelpfulError;
use crate::cli::output::print_json;
use alibre::reading::{BookContent, BookRef, ReadingError, ReadingSession};
use alibre_db::Book;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the read command
#[derive(Debug, Clone, clap::Args)]
pub struct ReadArgs {
    /// Book id (see `alibre books list`)
    #[arg(required_unless_present = "path", conflicts_with = "path")]
    pub id: Option<i64>,

    /// Open the book recorded for this file instead of an id
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// First line to print (default: saved position)
    #[arg(long)]
    pub from: Option<usize>,

    /// Lines per page (default: reader.page_lines from config)
    #[arg(long)]
    pub lines: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ReadOutput<'a> {
    book: &'a Book,
    content: ContentOutput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ContentOutput<'a> {
    Text {
        start: usize,
        end: usize,
        total_lines: usize,
        lines: Vec<&'a str>,
        position: usize,
    },
    PdfViewer {
        file_path: &'a str,
    },
    Unsupported {
        message: &'a str,
    },
}

/// Execute the read command
pub async fn run(args: ReadArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;

    let book_ref = match (&args.id, &args.path) {
        (Some(id), _) => BookRef::Id(*id),
        (None, Some(path)) => {
            let path = path.canonicalize().unwrap_or_else(|_| path.clone());
            BookRef::Path(path.to_string_lossy().into_owned())
        }
        (None, None) => return Err(HelpfulError::new("Specify a book id or --path").into()),
    };
    let requested = match &book_ref {
        BookRef::Id(id) => id.to_string(),
        BookRef::Path(path) => path.clone(),
    };

    let mut session = ReadingSession::open(library.db().clone(), book_ref)
        .await
        .map_err(|e| match e {
            ReadingError::BookNotFound => HelpfulError::book_not_found(&requested).into(),
            other => anyhow::Error::from(other),
        })?;

    let page_lines = args.lines.unwrap_or(ctx.config.reader.page_lines).max(1);
    let start = args.from.unwrap_or_else(|| session.last_position());

    match session.content().clone() {
        BookContent::Failed(message) => {
            return Err(HelpfulError::new(message)
                .with_context(format!("File: {}", session.book().file_path))
                .with_suggestion("TRY: Check that the file still exists and is readable")
                .with_suggestion("TRY: Rescan the library: alibre scan")
                .into());
        }
        BookContent::PdfViewer => {
            if args.json {
                return print_json(&ReadOutput {
                    book: session.book(),
                    content: ContentOutput::PdfViewer {
                        file_path: &session.book().file_path,
                    },
                });
            }
            println!("PDF viewer mode: open {} in a PDF viewer", session.book().file_path);
        }
        BookContent::Unsupported(message) => {
            if args.json {
                return print_json(&ReadOutput {
                    book: session.book(),
                    content: ContentOutput::Unsupported { message: &message },
                });
            }
            println!("{}", message);
        }
        BookContent::Text(text) => {
            let (page_start, page_end, total_lines) = session
                .page(start, page_lines)
                .map(|page| (page.start, page.end, page.total_lines))
                .unwrap_or_default();
            session.save_position(page_end).await?;

            let lines: Vec<&str> = text
                .lines()
                .skip(page_start)
                .take(page_end - page_start)
                .collect();

            if args.json {
                return print_json(&ReadOutput {
                    book: session.book(),
                    content: ContentOutput::Text {
                        start: page_start,
                        end: page_end,
                        total_lines,
                        lines,
                        position: page_end,
                    },
                });
            }

            let book = session.book();
            if lines.is_empty() {
                println!(
                    "-- {} | end of book ({} lines). Start over: alibre read {} --from 0 --",
                    book.title, total_lines, book.id
                );
                return Ok(());
            }

            for line in &lines {
                println!("{}", line);
            }
            println!();
            if page_end >= total_lines {
                println!(
                    "-- {} | lines {}-{} of {} (end) --",
                    book.title,
                    page_start + 1,
                    page_end,
                    total_lines
                );
            } else {
                println!(
                    "-- {} | lines {}-{} of {} | next: alibre read {} --",
                    book.title,
                    page_start + 1,
                    page_end,
                    total_lines,
                    book.id
                );
            }
        }
    }

    Ok(())
}
