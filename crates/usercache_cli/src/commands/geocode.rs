//! Geocoding commands.

use serde::Serialize;
use usercache_geocoder::{Coordinate, Geocoder, GeocoderConfig, ReqwestClient};

/// Result of a reverse lookup.
#[derive(Debug, Serialize)]
pub struct ReverseResult {
    /// Queried latitude.
    pub lat: f64,
    /// Queried longitude.
    pub lon: f64,
    /// Address reported by Nominatim.
    pub display_name: String,
}

fn geocoder(
    nominatim_url: Option<&str>,
) -> Result<Geocoder<ReqwestClient>, Box<dyn std::error::Error>> {
    let config = GeocoderConfig::from_override(nominatim_url);
    Ok(Geocoder::new(config, ReqwestClient::new()?))
}

/// Resolves `address` to a coordinate.
pub fn forward(
    nominatim_url: Option<&str>,
    address: &str,
) -> Result<Coordinate, Box<dyn std::error::Error>> {
    Ok(geocoder(nominatim_url)?.geocode(address)?)
}

/// Resolves a coordinate to an address.
pub fn reverse(
    nominatim_url: Option<&str>,
    lat: f64,
    lon: f64,
) -> Result<ReverseResult, Box<dyn std::error::Error>> {
    let display_name = geocoder(nominatim_url)?.reverse_geocode(lat, lon)?;
    Ok(ReverseResult {
        lat,
        lon,
        display_name,
    })
}
