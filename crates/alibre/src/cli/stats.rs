//! Stats command - library-wide counts

use crate::cli::context::AppContext;
use crate::cli::output::{color_for_format, print_json, print_table_colored};

/// Execute the stats command
pub async fn run(json: bool, ctx: &AppContext) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;
    let stats = library.db().stats().await?;

    if json {
        return print_json(&stats);
    }

    println!("LIBRARY");
    println!("=======");
    println!("Folders:       {}", stats.total_folders);
    println!("Books:         {}", stats.total_books);
    println!("Opened:        {}", stats.books_opened);

    if !stats.books_by_format.is_empty() {
        println!();
        let rows = stats
            .books_by_format
            .iter()
            .map(|f| {
                vec![
                    (f.format.clone(), Some(color_for_format(&f.format))),
                    (f.count.to_string(), None),
                ]
            })
            .collect();
        print_table_colored(&["FORMAT", "BOOKS"], rows);
    }
    Ok(())
}
