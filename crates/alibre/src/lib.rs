//! Alibre - personal e-book library
//!
//! Library folders are scanned for e-book files, their metadata is kept in
//! an [`alibre_db::AlibreDb`], and a subset of formats can be read as plain
//! text.
//!
//! - [`scout`]: folder access checks, format classification, scanner
//! - [`reader`]: format-dispatch text extraction
//! - [`library`]: folders, books and (re)scanning on top of the store
//! - [`reading`]: one open book with its content and reading position
//! - [`config`]: `config.toml` settings

pub mod config;
pub mod library;
pub mod reader;
pub mod reading;
pub mod scout;

pub use config::AlibreConfig;
pub use library::{Library, LibraryError};
pub use reading::{BookContent, BookRef, ReadingSession};
