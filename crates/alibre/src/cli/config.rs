//! Config command - show resolved paths and settings
//!
//! All paths are under ~/.alibre/ unless `ALIBRE_HOME`, `--config` or
//! `--db` say otherwise.

use crate::cli::context::AppContext;
use crate::cli::output::print_json;
use alibre_logging::{alibre_home, logs_dir};

/// Run the config command
pub fn run(json: bool, ctx: &AppContext) -> anyhow::Result<()> {
    let home = alibre_home();
    let logs = logs_dir();
    let config = &ctx.config;

    if json {
        let value = serde_json::json!({
            "home": home.to_string_lossy(),
            "config_file": {
                "path": ctx.config_path.to_string_lossy(),
                "exists": ctx.config_path.exists(),
            },
            "database": {
                "path": ctx.db_path.to_string_lossy(),
                "exists": ctx.db_path.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "scan": config.scan,
            "reader": config.reader,
        });
        return print_json(&value);
    }

    let exists = |present: bool| if present { "exists" } else { "not found" };

    println!("ALIBRE CONFIGURATION");
    println!("====================");
    println!();
    println!("Home:     {}", home.display());
    println!(
        "Config:   {} ({})",
        ctx.config_path.display(),
        exists(ctx.config_path.exists())
    );
    println!(
        "Database: {} ({})",
        ctx.db_path.display(),
        exists(ctx.db_path.exists())
    );
    println!("Logs:     {} ({})", logs.display(), exists(logs.exists()));
    println!();
    println!("[scan]");
    println!("  max_depth         = {}", config.scan.max_depth);
    println!("  follow_symlinks   = {}", config.scan.follow_symlinks);
    println!("  include_hidden    = {}", config.scan.include_hidden);
    println!("  exclude_dir_names = {:?}", config.scan.exclude_dir_names);
    println!("[reader]");
    println!("  page_lines        = {}", config.reader.page_lines);
    Ok(())
}
