//! Error types for the archive module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decompressing.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The filename has no suffix this module knows how to handle.
    #[error("Unknown archive format: {path}")]
    UnknownFormat { path: PathBuf },

    /// External extraction tool not found.
    #[error("Extraction tool not found: {tool}")]
    ToolNotFound { tool: PathBuf },

    /// Extraction failed.
    #[error("Extraction failed: {reason}")]
    ExtractionFailed {
        reason: String,
        stderr: Option<String>,
    },

    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub fn extraction_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
