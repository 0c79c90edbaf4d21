//! Error types for the user cache core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building entries or filters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A filter was built with invalid bounds.
    ///
    /// Raised instead of silently matching everything.
    #[error("malformed filter: {message}")]
    MalformedFilter {
        /// Description of the problem.
        message: String,
    },

    /// A record type name is not one of the known wire names.
    #[error("unknown record type: {0:?}")]
    UnknownRecordType(String),

    /// A time field name is neither `write_ts` nor `read_ts`.
    #[error("unknown time field: {0:?}")]
    UnknownTimeField(String),
}

impl CoreError {
    /// Creates a malformed filter error.
    pub fn malformed_filter(message: impl Into<String>) -> Self {
        Self::MalformedFilter {
            message: message.into(),
        }
    }
}
