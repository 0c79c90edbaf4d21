//! # User Cache Geocoder
//!
//! Forward and reverse geocoding against a Nominatim endpoint.
//!
//! The HTTP client is abstracted behind [`HttpClient`] so tests and embedders
//! can supply their own transport. With the default `reqwest-client` feature,
//! [`ReqwestClient`] provides a blocking implementation.
//!
//! ```rust
//! use usercache_geocoder::{Geocoder, GeocoderConfig, HttpClient};
//!
//! struct Canned;
//!
//! impl HttpClient for Canned {
//!     fn get(&self, _url: &str) -> Result<Vec<u8>, String> {
//!         Ok(br#"[{"lat": "37.4220", "lon": "-122.0841"}]"#.to_vec())
//!     }
//! }
//!
//! let geocoder = Geocoder::new(GeocoderConfig::default(), Canned);
//! let point = geocoder.geocode("1600 Amphitheatre Pkwy")?;
//! assert_eq!(point.lat, 37.4220);
//! # Ok::<(), usercache_geocoder::GeocodeError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod geocoder;
mod http;

pub use config::{GeocoderConfig, DEFAULT_NOMINATIM_URL, NOMINATIM_URL_ENV};
pub use error::{GeocodeError, GeocodeResult};
pub use geocoder::{Coordinate, Geocoder};
pub use http::HttpClient;

#[cfg(feature = "reqwest-client")]
pub use http::ReqwestClient;
