//! CLI context
//!
//! Resolves the config file and library database for one invocation.
//! Precedence for the database path: `--db`, then `database_path` from
//! config.toml, then `~/.alibre/library.sqlite3`.

use crate::cli::error::HelpfulError;
use alibre::config::{default_config_path, AlibreConfig};
use alibre::library::Library;
use alibre_db::AlibreDb;
use anyhow::Context as _;
use std::path::PathBuf;
use tracing::debug;

/// Resolved settings for a command
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AlibreConfig,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

impl AppContext {
    /// Load config; an explicit `--config` file must exist.
    pub fn load(config: Option<PathBuf>, db: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = match config {
            Some(path) if !path.exists() => {
                return Err(HelpfulError::config_not_found(&path).into());
            }
            Some(path) => path,
            None => default_config_path(),
        };

        let config = AlibreConfig::load(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;
        let db_path = db.unwrap_or_else(|| config.database_path.clone());

        debug!(config = %config_path.display(), db = %db_path.display(), "Resolved context");
        Ok(Self {
            config,
            config_path,
            db_path,
        })
    }

    /// Open (or create) the library database.
    pub async fn open_library(&self) -> anyhow::Result<Library> {
        let db = AlibreDb::open(&self.db_path).await.map_err(|e| {
            HelpfulError::new("Failed to open library database")
                .with_context(format!("Database: {}", self.db_path.display()))
                .with_suggestion(format!("Error: {}", e))
                .with_suggestion("TRY: Check file permissions")
                .with_suggestion("TRY: Pass a different location with --db")
        })?;
        Ok(Library::with_scan_config(db, self.config.scan.clone()))
    }
}
