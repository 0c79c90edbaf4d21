//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A persisted entry could not be decoded.
    #[error("store corrupted at line {line}: {message}")]
    Corrupted {
        /// 1-based line number in the entries file.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// An entry could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another process holds the store directory.
    #[error("store locked: another process has exclusive access to {path:?}")]
    Locked {
        /// The locked directory.
        path: PathBuf,
    },
}

impl StoreError {
    /// Returns true if the store could not be reached at all.
    ///
    /// Callers own retry policy for these; the cache never retries.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}
