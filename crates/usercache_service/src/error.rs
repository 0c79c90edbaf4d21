//! Error types for the user cache.

use thiserror::Error;
use usercache_core::CoreError;
use usercache_storage::StoreError;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur in cache operations.
///
/// An empty result is never an error.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The record store failed. Surfaced unchanged; the cache never retries.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A filter or entry could not be built.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An ingested entry violates the cache invariants.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

impl CacheError {
    /// Returns true if the underlying store could not be reached.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, CacheError::Store(err) if err.is_unavailable())
    }

    /// Returns true if the caller passed something invalid.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CacheError::Core(_) | CacheError::InvalidEntry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        let err = CacheError::from(StoreError::Unavailable("down".into()));
        assert!(err.is_store_unavailable());
        assert!(!err.is_client_error());

        let err = CacheError::from(CoreError::malformed_filter("no end"));
        assert!(err.is_client_error());
        assert!(!err.is_store_unavailable());
    }

    #[test]
    fn error_display() {
        let err = CacheError::InvalidEntry("document pushed as message".into());
        assert_eq!(err.to_string(), "invalid entry: document pushed as message");
    }
}
