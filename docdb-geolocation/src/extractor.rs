//! Image → place name pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docdb_shared::Coordinates;
use tracing::debug;

use crate::exif_gps::extract_coordinates;
use crate::normalize::normalize_place_name;
use crate::{GeolocationError, Geocoder, Result};

/// Reads GPS tags from images and resolves them to display-safe place names.
///
/// Holds no state besides the injected geocoder; every call queries it again.
#[derive(Clone)]
pub struct GeolocationExtractor {
    geocoder: Arc<dyn Geocoder>,
}

impl GeolocationExtractor {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Place name for the photo at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(String::new())` - The image has no usable GPS data, or the geocoder knows no place there
    /// * `Ok(name)` - The normalised formatted address of the first geocoding result
    /// * `Err(GeolocationError)` - Reading the file or calling the geocoder failed
    pub async fn locate(&self, path: impl AsRef<Path>) -> Result<String> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let coordinates = tokio::task::spawn_blocking(move || extract_coordinates(path))
            .await
            .map_err(|e| GeolocationError::Task(e.to_string()))??;

        match coordinates {
            Some(coordinates) => self.resolve(coordinates).await,
            None => Ok(String::new()),
        }
    }

    /// Place name for already-known coordinates.
    ///
    /// The zero location resolves to an empty string without a lookup.
    pub async fn resolve(&self, coordinates: Coordinates) -> Result<String> {
        if coordinates.is_zero() {
            return Ok(String::new());
        }

        let place = self
            .geocoder
            .reverse(coordinates)
            .await?
            .map(|name| normalize_place_name(&name))
            .unwrap_or_default();

        debug!(coordinates = %coordinates, place = %place, "Resolved place name");
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockGeocoder;

    fn extractor_with(geocoder: Arc<MockGeocoder>) -> GeolocationExtractor {
        GeolocationExtractor::new(geocoder)
    }

    #[tokio::test]
    async fn test_resolve_normalises_name() {
        let geocoder = Arc::new(MockGeocoder::new());
        geocoder.register(Coordinates::new(50.06, 19.94), "\"Kraków, Polska\"");

        let place = extractor_with(geocoder)
            .resolve(Coordinates::new(50.06, 19.94))
            .await
            .unwrap();

        assert_eq!(place, "Krakow, Polska");
    }

    #[tokio::test]
    async fn test_resolve_unknown_place_is_empty() {
        let place = extractor_with(Arc::new(MockGeocoder::new()))
            .resolve(Coordinates::new(10.0, 10.0))
            .await
            .unwrap();

        assert_eq!(place, "");
    }

    #[tokio::test]
    async fn test_resolve_zero_skips_geocoder() {
        let geocoder = Arc::new(MockGeocoder::new());
        let place = extractor_with(geocoder.clone())
            .resolve(Coordinates::new(0.0, 0.0))
            .await
            .unwrap();

        assert_eq!(place, "");
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_locate_image_without_gps_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();

        let geocoder = Arc::new(MockGeocoder::new());
        let place = extractor_with(geocoder.clone()).locate(&path).await.unwrap();

        assert_eq!(place, "");
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_locate_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = extractor_with(Arc::new(MockGeocoder::new()))
            .locate(dir.path().join("nope.jpg"))
            .await;

        assert!(matches!(result, Err(GeolocationError::Io(_))));
    }
}
