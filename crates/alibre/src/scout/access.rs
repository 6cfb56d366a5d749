//! Folder access grants.
//!
//! A library folder is usable only while the process can list it. The
//! check runs when a folder is added and again before every scan, so a
//! revoked grant (deleted, unmounted, permissions changed) is reported
//! instead of looking like an empty folder.

use super::error::ScoutError;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AccessStatus {
    Granted,
    Missing,
    NotADirectory,
    Denied(String),
}

impl AccessStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessStatus::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Granted => "granted",
            AccessStatus::Missing => "missing",
            AccessStatus::NotADirectory => "not_a_directory",
            AccessStatus::Denied(_) => "denied",
        }
    }

    /// Convert a failed check into the matching scan error.
    pub fn into_result(self, path: &Path) -> Result<(), ScoutError> {
        let display = path.display().to_string();
        match self {
            AccessStatus::Granted => Ok(()),
            AccessStatus::Missing => Err(ScoutError::FolderNotFound(display)),
            AccessStatus::NotADirectory => Err(ScoutError::NotADirectory(display)),
            AccessStatus::Denied(reason) => Err(ScoutError::AccessDenied {
                path: display,
                reason,
            }),
        }
    }
}

/// Check that `path` exists, is a directory and can be listed.
pub fn check_access(path: &Path) -> AccessStatus {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return AccessStatus::Missing,
        Err(err) => return AccessStatus::Denied(err.to_string()),
    };

    if !metadata.is_dir() {
        return AccessStatus::NotADirectory;
    }

    match fs::read_dir(path) {
        Ok(_) => AccessStatus::Granted,
        Err(err) => AccessStatus::Denied(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_directory_is_granted() {
        let tmp = TempDir::new().unwrap();
        let status = check_access(tmp.path());
        assert!(status.is_granted());
        assert!(status.into_result(tmp.path()).is_ok());
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let status = check_access(&missing);
        assert_eq!(status, AccessStatus::Missing);
        assert!(matches!(
            status.into_result(&missing),
            Err(ScoutError::FolderNotFound(_))
        ));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("book.txt");
        fs::write(&file, "text").unwrap();
        assert_eq!(check_access(&file), AccessStatus::NotADirectory);
    }
}
