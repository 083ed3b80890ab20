// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared file reading for file-backed property sources.

use crate::domain::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for a property file (10MB).
pub(crate) const MAX_PROPERTY_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Canonicalizes `path`, checks its size and reads it as UTF-8.
///
/// Error messages carry the file name only, not the full path.
pub(crate) fn read_bounded(source_name: &str, path: &Path) -> Result<(PathBuf, String)> {
    let display_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string();

    let source_error = |message: String, err: std::io::Error| ConfigError::SourceError {
        source_name: source_name.to_string(),
        message,
        source: Some(Box::new(err)),
    };

    let canonical = path
        .canonicalize()
        .map_err(|e| source_error(format!("Invalid or inaccessible path: {}", display_name), e))?;

    let metadata = fs::metadata(&canonical)
        .map_err(|e| source_error(format!("Failed to read file metadata: {}", display_name), e))?;

    if metadata.len() > MAX_PROPERTY_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: format!(
                "Property file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_PROPERTY_FILE_SIZE
            ),
            source: None,
        });
    }

    let content = fs::read_to_string(&canonical)
        .map_err(|e| source_error(format!("Failed to read property file: {}", display_name), e))?;

    tracing::debug!("Read {} bytes from {}", content.len(), display_name);

    Ok((canonical, content))
}
