//! Error types for folder access and scanning

use std::io;
use thiserror::Error;

/// Scout error type
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// One entry below the root could not be read.
    #[error("Unreadable entry: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Access denied for {path}: {reason}")]
    AccessDenied { path: String, reason: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoutError>;
