//! Utility functions for error handling
//!
//! Helpers that read local files and turn IO failures into errors that
//! name the path and the reason the file was needed.

use std::io;
use std::path::Path;

use anyhow::anyhow;

use crate::error::{Error, Result};

/// Safely read a file to string with rich error information
///
/// # Arguments
/// * `path` - The path to the file to read
/// * `purpose` - Why the file is being read (for error context)
pub async fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::NotFound => format!("File not found, needed for: {purpose}"),
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check file permissions".to_string()
                }
                io::ErrorKind::InvalidData => {
                    "File contains invalid UTF-8 data - cannot read as text".to_string()
                }
                _ => format!("Failed to read file content for: {purpose}"),
            };

            Err(Error::Other(anyhow!("{context} ({}): {e}", path.display())))
        }
    }
}

/// Check if a directory exists, creating it when missing
pub async fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    if path.exists() {
        return Err(Error::Other(anyhow!(
            "Path is not a directory ({}), expected a directory for: {purpose}",
            path.display()
        )));
    }

    tokio::fs::create_dir_all(path).await.map_err(|e| {
        Error::Other(anyhow!(
            "Failed to create directory {} for {purpose}: {e}",
            path.display()
        ))
    })
}
