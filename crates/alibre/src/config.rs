//! Alibre configuration
//!
//! Reads settings from `~/.alibre/config.toml` (or `$ALIBRE_HOME/config.toml`).
//! Every section is optional; missing keys fall back to defaults.

use crate::scout::ScanConfig;
use alibre_logging::alibre_home;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root of config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlibreConfig {
    /// SQLite library database
    pub database_path: PathBuf,
    pub scan: ScanConfig,
    pub reader: ReaderConfig,
}

impl Default for AlibreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            scan: ScanConfig::default(),
            reader: ReaderConfig::default(),
        }
    }
}

/// `[reader]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Lines printed per `alibre read` page
    pub page_lines: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { page_lines: 40 }
    }
}

pub fn default_database_path() -> PathBuf {
    alibre_home().join("library.sqlite3")
}

pub fn default_config_path() -> PathBuf {
    alibre_home().join("config.toml")
}

impl AlibreConfig {
    /// Load from a file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
