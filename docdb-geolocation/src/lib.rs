//! Geolocation extraction for uploaded images.
//!
//! This crate provides:
//! - [`extract_coordinates`] to read EXIF GPS tags from an image file
//! - [`Geocoder`] trait for abstracting reverse geocoding
//! - [`HttpGeocoder`] production client that queries a geocoding HTTP API
//! - [`MockGeocoder`] mock client for testing with pre-configured answers
//! - [`GeolocationExtractor`] chaining the two into a display-safe place name
//!
//! ## Usage with GeocoderSource
//!
//! ```ignore
//! use docdb_geolocation::{GeocoderSource, GeolocationExtractor};
//!
//! let geocoder = GeocoderSource::live("https://maps.googleapis.com/maps/api/geocode/json")
//!     .into_geocoder()?;
//! let extractor = GeolocationExtractor::new(geocoder);
//!
//! // "" when the photo carries no usable GPS data
//! let place = extractor.locate("files/holiday.jpg").await?;
//! ```

mod exif_gps;
mod extractor;
mod http;
mod mock;
mod normalize;

pub use exif_gps::{coordinates_from_exif, dms_to_degrees, extract_coordinates};
pub use extractor::GeolocationExtractor;
pub use http::{place_name_from_response, HttpGeocoder, DEFAULT_TIMEOUT};
pub use mock::MockGeocoder;
pub use normalize::normalize_place_name;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use docdb_shared::Coordinates;

#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("geocoding service error: {0}")]
    Service(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, GeolocationError>;

/// Trait for turning coordinates into a place name.
///
/// This trait abstracts the geocoding service to enable dependency injection
/// and mocking for testing. Production code uses [`HttpGeocoder`], while
/// tests can use [`MockGeocoder`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up the formatted address of the first result for `coordinates`.
    ///
    /// Returns `Ok(None)` when the service knows no place at that location.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>>;
}

/// Configuration for the geocoding backend.
///
/// Use this to explicitly choose between mock and live geocoders.
#[derive(Debug, Clone)]
pub enum GeocoderSource {
    /// Use a mock geocoder with pre-configured coordinate → address answers.
    Mock(HashMap<String, String>),

    /// Query a live geocoding HTTP API.
    Live {
        /// The endpoint URL (e.g., "https://maps.googleapis.com/maps/api/geocode/json")
        base_url: String,
        /// Optional API key appended as the `key` query parameter.
        api_key: Option<String>,
        /// Per-request timeout.
        timeout: Duration,
    },
}

impl GeocoderSource {
    /// Create a mock source. Keys are `"lat,lng"` strings as produced by
    /// `Coordinates`'s `Display` implementation.
    pub fn mock(answers: HashMap<String, String>) -> Self {
        Self::Mock(answers)
    }

    /// Create a live source with no API key and the default timeout.
    pub fn live(base_url: impl Into<String>) -> Self {
        Self::Live {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create the appropriate Geocoder implementation.
    pub fn into_geocoder(self) -> Result<Arc<dyn Geocoder>> {
        match self {
            Self::Mock(answers) => Ok(Arc::new(MockGeocoder::with_answers(answers))),
            Self::Live {
                base_url,
                api_key,
                timeout,
            } => Ok(Arc::new(HttpGeocoder::new(&base_url, api_key, timeout)?)),
        }
    }
}
