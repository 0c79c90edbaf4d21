//! HTTP client abstraction.
//!
//! The geocoder only issues GET requests and reads the whole body, so the
//! client surface is a single method. Implement [`HttpClient`] to plug in a
//! different HTTP library or a canned transport for tests.

/// HTTP client abstraction.
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response body.
    ///
    /// Non-success status codes are errors.
    fn get(&self, url: &str) -> Result<Vec<u8>, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        (**self).get(url)
    }
}

#[cfg(feature = "reqwest-client")]
pub use self::reqwest_client::ReqwestClient;

#[cfg(feature = "reqwest-client")]
mod reqwest_client {
    use super::HttpClient;
    use crate::error::{GeocodeError, GeocodeResult};
    use std::time::Duration;

    /// Blocking HTTP client backed by `reqwest`.
    ///
    /// Nominatim's usage policy requires an identifying user agent, which is
    /// set to this crate's name and version.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        inner: reqwest::blocking::Client,
    }

    impl ReqwestClient {
        /// Default request timeout.
        pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

        /// Creates a client with [`Self::DEFAULT_TIMEOUT`].
        ///
        /// # Errors
        ///
        /// Returns [`GeocodeError::Network`] if the TLS backend cannot be
        /// initialized.
        pub fn new() -> GeocodeResult<Self> {
            Self::with_timeout(Self::DEFAULT_TIMEOUT)
        }

        /// Creates a client with a custom request timeout.
        ///
        /// # Errors
        ///
        /// Returns [`GeocodeError::Network`] if the TLS backend cannot be
        /// initialized.
        pub fn with_timeout(timeout: Duration) -> GeocodeResult<Self> {
            let inner = reqwest::blocking::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .map_err(|e| GeocodeError::Network(e.to_string()))?;
            Ok(Self { inner })
        }
    }

    impl HttpClient for ReqwestClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, String> {
            let response = self
                .inner
                .get(url)
                .send()
                .map_err(|e| format!("request failed: {e}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP {status}"));
            }

            response
                .bytes()
                .map(|bytes| bytes.to_vec())
                .map_err(|e| format!("failed to read response: {e}"))
        }
    }
}
