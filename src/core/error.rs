//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Only `InvalidFolder` ever escapes a scan operation. `Io` and `Extraction`
/// are produced per file and cause that single file to be skipped.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The scan root is missing or is not a directory.
    #[error("Path is not a valid directory: {0}")]
    InvalidFolder(PathBuf),

    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Text could not be extracted from a document (corrupt or unsupported).
    #[error("Failed to extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// The external editor process could not be started.
    #[error("Failed to launch editor '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
