//! Scan command - import one folder or rescan the whole library
//!
//! `alibre scan <PATH>` registers the folder if needed and records its
//! books. `alibre scan` walks every library folder again, dropping records
//! for files that are gone.

use crate::cli::context::AppContext;
use crate::cli::error::HelpfulError;
use crate::cli::output::print_json;
use alibre::library::{FolderScan, RescanReport};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Arguments for the scan command
#[derive(Debug, Clone, clap::Args)]
pub struct ScanArgs {
    /// Folder to import; omit to rescan every library folder
    pub path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ImportOutput {
    folder_added: bool,
    #[serde(flatten)]
    scan: FolderScan,
}

/// Execute the scan command
pub async fn run(args: ScanArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.path {
        Some(path) => import(ctx, path, args.json).await,
        None => rescan(ctx, args.json).await,
    }
}

async fn import(ctx: &AppContext, path: &Path, json: bool) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;
    let (outcome, scan) = library
        .import_folder(path)
        .await
        .map_err(|e| HelpfulError::from_library(e, path))?;

    if json {
        return print_json(&ImportOutput {
            folder_added: outcome.is_new(),
            scan,
        });
    }

    println!("Scanned {}", scan.folder.path);
    println!(
        "  {} book{} found, {} new, {} already known",
        scan.stats.books_found,
        if scan.stats.books_found == 1 { "" } else { "s" },
        scan.books_added,
        scan.books_known,
    );
    println!(
        "  {} files seen in {} directories ({} ms)",
        scan.stats.files_seen, scan.stats.dirs_scanned, scan.stats.duration_ms
    );
    print_entry_errors(&scan.errors);
    Ok(())
}

async fn rescan(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let library = ctx.open_library().await?;
    let report: RescanReport = library.rescan_all().await?;

    if json {
        return print_json(&report);
    }

    println!(
        "Rescanned {} folder{}: {} added, {} removed, {} total",
        report.folders_scanned,
        if report.folders_scanned == 1 { "" } else { "s" },
        report.books_added,
        report.books_removed,
        report.books_total,
    );
    for folder in &report.unavailable {
        eprintln!(
            "  WARN: folder unavailable, kept {} book{}: {} ({})",
            folder.books_retained,
            if folder.books_retained == 1 { "" } else { "s" },
            folder.path,
            folder.reason
        );
    }
    print_entry_errors(&report.errors);
    Ok(())
}

fn print_entry_errors(errors: &[alibre::scout::ScanError]) {
    for error in errors {
        eprintln!("  WARN: {}: {}", error.path, error.message);
    }
}
