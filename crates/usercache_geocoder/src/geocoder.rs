//! Nominatim queries.

use crate::config::GeocoderConfig;
use crate::error::{GeocodeError, GeocodeResult};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, -90 to 90.
    pub lat: f64,
    /// Longitude, -180 to 180.
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidCoordinate`] if either component is
    /// non-finite or out of range.
    pub fn new(lat: f64, lon: f64) -> GeocodeResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeocodeError::InvalidCoordinate(format!("latitude {lat}")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeocodeError::InvalidCoordinate(format!("longitude {lon}")));
        }
        Ok(Self { lat, lon })
    }
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    format: &'static str,
}

#[derive(Serialize)]
struct ReverseQuery {
    lat: f64,
    lon: f64,
    format: &'static str,
}

// Nominatim sends coordinates as decimal strings.
#[derive(Deserialize)]
struct SearchHit {
    lat: Option<String>,
    lon: Option<String>,
}

#[derive(Deserialize)]
struct ReverseHit {
    display_name: Option<String>,
}

/// Forward and reverse geocoder over an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct Geocoder<C: HttpClient> {
    config: GeocoderConfig,
    client: C,
}

impl<C: HttpClient> Geocoder<C> {
    /// Creates a geocoder.
    pub fn new(config: GeocoderConfig, client: C) -> Self {
        Self { config, client }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Builds the search URL for a free-form address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Encode`] if the query cannot be encoded.
    pub fn search_url(&self, address: &str) -> GeocodeResult<String> {
        let query = serde_urlencoded::to_string(SearchQuery {
            q: address,
            format: "json",
        })?;
        Ok(format!("{}/search?{query}", self.config.base_url))
    }

    /// Builds the reverse lookup URL for a point.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidCoordinate`] for an out-of-range point,
    /// or [`GeocodeError::Encode`] if the query cannot be encoded.
    pub fn reverse_url(&self, lat: f64, lon: f64) -> GeocodeResult<String> {
        let point = Coordinate::new(lat, lon)?;
        let query = serde_urlencoded::to_string(ReverseQuery {
            lat: point.lat,
            lon: point.lon,
            format: "json",
        })?;
        Ok(format!("{}/reverse?{query}", self.config.base_url))
    }

    /// Resolves an address to the first matching point.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::NoResults`] when nothing matched, a network
    /// error if the request failed, or a decode error for an unexpected body.
    pub fn geocode(&self, address: &str) -> GeocodeResult<Coordinate> {
        let url = self.search_url(address)?;
        let body = self.fetch(&url)?;

        let hits: Vec<SearchHit> = serde_json::from_slice(&body)?;
        let first = hits.into_iter().next().ok_or(GeocodeError::NoResults)?;
        let lat = parse_degrees(first.lat, "lat")?;
        let lon = parse_degrees(first.lon, "lon")?;

        debug!(address, lat, lon, "geocoded address");
        Coordinate::new(lat, lon)
    }

    /// Resolves a point to a display address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::MissingField`] when the response has no
    /// `display_name`, a network error if the request failed, or a decode
    /// error for an unexpected body.
    pub fn reverse_geocode(&self, lat: f64, lon: f64) -> GeocodeResult<String> {
        let url = self.reverse_url(lat, lon)?;
        let body = self.fetch(&url)?;

        let hit: ReverseHit = serde_json::from_slice(&body)?;
        let name = hit
            .display_name
            .ok_or(GeocodeError::MissingField("display_name"))?;

        debug!(lat, lon, name = %name, "reverse geocoded point");
        Ok(name)
    }

    fn fetch(&self, url: &str) -> GeocodeResult<Vec<u8>> {
        debug!(url, "querying nominatim");
        self.client.get(url).map_err(|e| {
            warn!(url, error = %e, "nominatim request failed");
            GeocodeError::Network(e)
        })
    }
}

fn parse_degrees(value: Option<String>, field: &'static str) -> GeocodeResult<f64> {
    let raw = value.ok_or(GeocodeError::MissingField(field))?;
    raw.trim()
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(format!("{field} {raw:?}")))
}
