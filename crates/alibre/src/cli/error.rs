//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use alibre::library::LibraryError;
use alibre::scout::ScoutError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Path does not exist
    pub fn path_not_found(path: &Path) -> Self {
        Self::new(format!("Path not found: {}", path.display()))
            .with_context("The specified path does not exist on the filesystem")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Check for typos in the path".to_string(),
            ])
    }

    /// Path exists but is not a directory
    pub fn not_a_directory(path: &Path) -> Self {
        Self::new(format!("Not a directory: {}", path.display()))
            .with_context("Library folders must be directories")
            .with_suggestion(format!(
                "TRY: Add the parent directory: alibre folder add {}",
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".".to_string())
            ))
    }

    /// Folder exists but cannot be listed
    pub fn access_denied(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot access folder: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                format!("TRY: Check folder permissions: ls -ld {}", path.display()),
                "TRY: Make sure the drive or network share is mounted".to_string(),
            ])
    }

    /// Folder is not registered in the library
    pub fn folder_not_registered(path: &Path) -> Self {
        Self::new(format!("Folder is not in the library: {}", path.display()))
            .with_suggestion("TRY: List library folders: alibre folder list")
    }

    /// No book with this id or path
    pub fn book_not_found(what: impl fmt::Display) -> Self {
        Self::new(format!("Book not found in library: {}", what))
            .with_suggestions([
                "TRY: List books and their ids: alibre books list".to_string(),
                "TRY: Rescan library folders: alibre scan".to_string(),
            ])
    }

    /// Config file given on the command line does not exist
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .with_context("The file passed with --config does not exist")
            .with_suggestion("TRY: Omit --config to use ~/.alibre/config.toml")
    }

    /// Map a folder access or scan failure for `path`.
    pub fn from_library(err: LibraryError, path: &Path) -> Self {
        match err {
            LibraryError::Scout(ScoutError::FolderNotFound(_)) => Self::path_not_found(path),
            LibraryError::Scout(ScoutError::NotADirectory(_)) => Self::not_a_directory(path),
            LibraryError::Scout(ScoutError::AccessDenied { reason, .. }) => {
                Self::access_denied(path, &reason)
            }
            LibraryError::FolderNotRegistered(_) => Self::folder_not_registered(path),
            other => Self::new(format!("Library operation failed: {}", other))
                .with_context(format!("Path: {}", path.display())),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "message": self.message,
                "context": self.context,
                "suggestions": self.suggestions,
            }
        })
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print a command failure as a JSON object on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let value = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => helpful.to_json(),
        None => HelpfulError::new(format!("{:#}", err)).to_json(),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(_) => eprintln!("{:?}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While scanning")
            .with_suggestion("Try again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While scanning"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_path_not_found() {
        let path = PathBuf::from("/nonexistent/path");
        let display = format!("{}", HelpfulError::path_not_found(&path));
        assert!(display.contains("/nonexistent/path"));
        assert!(display.contains("TRY:"));
    }

    #[test]
    fn test_from_library_maps_access_failures() {
        let path = PathBuf::from("/books");
        let err = HelpfulError::from_library(
            LibraryError::Scout(ScoutError::NotADirectory("/books".into())),
            &path,
        );
        assert!(err.message.starts_with("Not a directory"));

        let err = HelpfulError::from_library(
            LibraryError::Scout(ScoutError::AccessDenied {
                path: "/books".into(),
                reason: "permission denied".into(),
            }),
            &path,
        );
        assert_eq!(err.context.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_json_shape() {
        let json = HelpfulError::new("boom").with_suggestion("TRY: x").to_json();
        assert_eq!(json["error"]["message"], "boom");
        assert!(json["error"]["context"].is_null());
        assert_eq!(json["error"]["suggestions"][0], "TRY: x");
    }
}
