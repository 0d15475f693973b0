//! Error types for the memory bank collaborator layer.
//!
//! The engine functions never fail; only query validation and filesystem
//! access report errors.

use std::path::PathBuf;
use thiserror::Error;

/// Error types for memory bank operations.
#[derive(Error, Debug)]
pub enum MemoryBankError {
    /// Query is empty after trimming.
    #[error("Search query is empty")]
    EmptyQuery,

    /// Query is shorter than the configured minimum.
    #[error("Search query too short: {actual} characters (minimum: {min})")]
    QueryTooShort {
        /// Required minimum length in characters.
        min: usize,
        /// Length of the trimmed query in characters.
        actual: usize,
    },

    /// Memory bank directory does not exist.
    #[error("Memory bank not initialized: {}", .0.display())]
    NotInitialized(PathBuf),

    /// Name does not match any of the known document types.
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Filesystem failure for a specific path.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Export serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MemoryBankError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for memory bank operations.
pub type Result<T> = std::result::Result<T, MemoryBankError>;
