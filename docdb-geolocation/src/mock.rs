//! Mock geocoder for testing and local development.
//!
//! The `MockGeocoder` can be pre-populated with coordinate → address
//! mappings, allowing tests to run without network access.
//!
//! # Example
//!
//! ```ignore
//! use docdb_geolocation::{Geocoder, MockGeocoder};
//! use docdb_shared::Coordinates;
//!
//! let geocoder = MockGeocoder::new();
//! geocoder.register(Coordinates::new(50.06, 19.94), "Kraków, Poland");
//! let place = geocoder.reverse(Coordinates::new(50.06, 19.94)).await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use docdb_shared::Coordinates;

use crate::{Geocoder, Result};

/// Mock geocoder that returns pre-configured addresses.
///
/// Unregistered coordinates resolve to `None`.
#[derive(Default)]
pub struct MockGeocoder {
    /// Map of "lat,lng" -> formatted address
    answers: RwLock<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    /// Create a new empty mock geocoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock geocoder pre-populated with "lat,lng" → address mappings.
    pub fn with_answers(answers: HashMap<String, String>) -> Self {
        Self {
            answers: RwLock::new(answers),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register the address returned for `coordinates`.
    pub fn register(&self, coordinates: Coordinates, address: impl Into<String>) {
        let mut answers = self.answers.write().unwrap_or_else(|e| e.into_inner());
        answers.insert(coordinates.to_string(), address.into());
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answers = self.answers.read().unwrap_or_else(|e| e.into_inner());
        Ok(answers.get(&coordinates.to_string()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_and_unknown_coordinates() {
        let geocoder = MockGeocoder::new();
        geocoder.register(Coordinates::new(50.06, 19.94), "Kraków, Poland");

        assert_eq!(
            geocoder.reverse(Coordinates::new(50.06, 19.94)).await.unwrap(),
            Some("Kraków, Poland".to_string())
        );
        assert_eq!(geocoder.reverse(Coordinates::new(1.0, 1.0)).await.unwrap(), None);
        assert_eq!(geocoder.calls(), 2);
    }
}
