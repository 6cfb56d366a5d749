//! Scout - folder access, scanning and format classification
//!
//! Scout walks library folders and turns supported files into book
//! records. Persistence lives in [`crate::library`].

pub mod access;
pub mod error;
pub mod filename;
pub mod format;
pub mod scanner;
pub mod types;

pub use access::{check_access, AccessStatus};
pub use error::{Result, ScoutError};
pub use format::{file_extension, BookFormat};
pub use scanner::{ScanConfig, Scanner, DEFAULT_EXCLUDE_DIR_NAMES};
pub use types::{DiscoveredBook, ScanError, ScanResult, ScanStats};
