//! Error types for geocoding.

use thiserror::Error;

/// Result type for geocoding operations.
pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Errors that can occur while geocoding.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The request did not complete. Not retried.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The search returned no hits.
    #[error("no results")]
    NoResults,

    /// A coordinate was out of range or unparseable.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The response lacked a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The query string could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

impl GeocodeError {
    /// Returns true if the failure came from the transport rather than the data.
    pub fn is_network(&self) -> bool {
        matches!(self, GeocodeError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            GeocodeError::MissingField("display_name").to_string(),
            "missing field: display_name"
        );
        assert_eq!(GeocodeError::NoResults.to_string(), "no results");
    }

    #[test]
    fn network_classification() {
        assert!(GeocodeError::Network("refused".into()).is_network());
        assert!(!GeocodeError::NoResults.is_network());
    }
}
