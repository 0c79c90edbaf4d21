//! Geocoder configuration.

/// Public Nominatim instance used when nothing else is configured.
pub const DEFAULT_NOMINATIM_URL: &str = "http://nominatim.openstreetmap.org";

/// Environment variable that overrides the Nominatim base URL.
pub const NOMINATIM_URL_ENV: &str = "NOMINATIM_QUERY_URL";

/// Configuration for a [`crate::Geocoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim service, without a trailing slash.
    pub base_url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
        }
    }
}

impl GeocoderConfig {
    /// Creates a configuration for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Sets the base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Resolves the base URL from an optional override.
    ///
    /// `None` or an empty string selects [`DEFAULT_NOMINATIM_URL`].
    pub fn from_override(base_url: Option<&str>) -> Self {
        match base_url.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Reads [`NOMINATIM_URL_ENV`] once. Meant for process startup.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(NOMINATIM_URL_ENV).ok().as_deref())
    }
}
