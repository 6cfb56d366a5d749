//! Folder commands - manage library folders
//!
//! Adding a folder checks that it can be listed and, unless `--no-scan`,
//! imports its books right away.

use crate::cli::context::AppContext;
use crate::cli::error::HelpfulError;
use crate::cli::output::{print_json, print_table};
use alibre::library::FolderScan;
use alibre::scout::check_access;
use alibre_db::LibraryFolder;
use clap::Subcommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug, Clone)]
pub enum FolderAction {
    /// Add a folder to the library and scan it
    Add {
        /// Folder to add
        path: PathBuf,
        /// Register the folder without scanning it
        #[arg(long)]
        no_scan: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List library folders
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a folder and every book recorded under it
    Remove {
        /// Folder to remove
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl FolderAction {
    pub fn wants_json(&self) -> bool {
        match self {
            FolderAction::Add { json, .. }
            | FolderAction::List { json }
            | FolderAction::Remove { json, .. } => *json,
        }
    }
}

#[derive(Debug, Serialize)]
struct FolderAddOutput {
    folder: LibraryFolder,
    added: bool,
    scan: Option<FolderScan>,
}

#[derive(Debug, Serialize)]
struct FolderListEntry {
    id: i64,
    path: String,
    access: String,
    books: usize,
}

#[derive(Debug, Serialize)]
struct FolderRemoveOutput {
    folder: LibraryFolder,
    books_removed: u64,
}

pub async fn run(action: FolderAction, ctx: &AppContext) -> anyhow::Result<()> {
    match action {
        FolderAction::Add {
            path,
            no_scan,
            json,
        } => add(ctx, &path, no_scan, json).await,
        FolderAction::List { json } => list(ctx, json).await,
        FolderAction::Remove { path, json } => remove(ctx, &path, json).await,
    }
}

async fn add(ctx: &AppContext, path: &Path, no_scan: bool, json: bool) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;
    let outcome = library
        .add_folder(path)
        .await
        .map_err(|e| HelpfulError::from_library(e, path))?;

    let scan = if no_scan {
        None
    } else {
        Some(
            library
                .scan_folder(outcome.folder())
                .await
                .map_err(|e| HelpfulError::from_library(e, path))?,
        )
    };

    let added = outcome.is_new();
    let folder = outcome.into_folder();

    if json {
        return print_json(&FolderAddOutput {
            folder,
            added,
            scan,
        });
    }

    if added {
        println!("Added folder: {}", folder.path);
    } else {
        println!("Folder already in library: {}", folder.path);
    }
    if let Some(scan) = scan {
        println!(
            "Scanned {} director{}: {} new book{}, {} already known, {} unsupported file{}",
            scan.stats.dirs_scanned,
            if scan.stats.dirs_scanned == 1 { "y" } else { "ies" },
            scan.books_added,
            if scan.books_added == 1 { "" } else { "s" },
            scan.books_known,
            scan.stats.files_skipped,
            if scan.stats.files_skipped == 1 { "" } else { "s" },
        );
        for error in &scan.errors {
            eprintln!("  WARN: {}: {}", error.path, error.message);
        }
    }
    Ok(())
}

async fn list(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;

    let mut entries = Vec::new();
    for folder in library.folders().await? {
        let books = library.db().book_list_by_folder(&folder.path).await?.len();
        entries.push(FolderListEntry {
            access: check_access(Path::new(&folder.path)).as_str().to_string(),
            id: folder.id,
            path: folder.path,
            books,
        });
    }

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No library folders. Add one with: alibre folder add <PATH>");
        return Ok(());
    }

    let rows = entries
        .into_iter()
        .map(|e| vec![e.id.to_string(), e.path, e.access, e.books.to_string()])
        .collect();
    print_table(&["ID", "PATH", "ACCESS", "BOOKS"], rows);
    Ok(())
}

async fn remove(ctx: &AppContext, path: &Path, json: bool) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;
    let folder = library
        .folder_by_path(path)
        .await?
        .ok_or_else(|| HelpfulError::folder_not_registered(path))?;

    let books_removed = library
        .remove_folder(&folder)
        .await
        .map_err(|e| HelpfulError::from_library(e, path))?;

    if json {
        return print_json(&FolderRemoveOutput {
            folder,
            books_removed,
        });
    }

    println!(
        "Removed folder {} ({} book{})",
        folder.path,
        books_removed,
        if books_removed == 1 { "" } else { "s" }
    );
    Ok(())
}
