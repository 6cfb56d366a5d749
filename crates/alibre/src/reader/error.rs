//! Error types for document text extraction

use thiserror::Error;

/// Reader error type
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Cannot convert HTML: {0}")]
    Html(String),

    #[error("Background read failed: {0}")]
    Background(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ReaderError>;
