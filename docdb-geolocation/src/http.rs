//! Reverse geocoding over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use docdb_shared::Coordinates;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{GeolocationError, Geocoder, Result};

/// Default per-request timeout for the geocoding service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Production geocoder querying a Google-compatible geocoding endpoint.
///
/// # Example
///
/// ```ignore
/// use docdb_geolocation::HttpGeocoder;
///
/// let geocoder = HttpGeocoder::new(
///     "https://maps.googleapis.com/maps/api/geocode/json",
///     Some(api_key),
///     DEFAULT_TIMEOUT,
/// )?;
/// let place = geocoder.reverse(Coordinates::new(50.06, 19.94)).await?;
/// ```
pub struct HttpGeocoder {
    url: String,
    api_key: Option<String>,
    client: ReqwestClient,
}

impl HttpGeocoder {
    pub fn new(url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(HttpGeocoder {
            url: url.to_string(),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>> {
        let mut params = vec![("latlng", coordinates.to_string())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.clone()));
        }

        let res = self.client.get(&self.url).query(&params).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!(status = %status, "Geocoding request failed");
            return Err(GeolocationError::Service(format!("HTTP status {}", status)));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| GeolocationError::Parse(e.to_string()))?;

        let place = place_name_from_response(&body)?;
        debug!(coordinates = %coordinates, found = place.is_some(), "Geocoding answered");
        Ok(place)
    }
}

/// Take the first result's `formatted_address` from a geocoding response.
///
/// `ZERO_RESULTS` and an empty `results` array give `Ok(None)`. Any other
/// non-`OK` status is reported as a service error.
pub fn place_name_from_response(body: &Value) -> Result<Option<String>> {
    match body.get("status").and_then(Value::as_str) {
        None | Some("OK") => {}
        Some("ZERO_RESULTS") => return Ok(None),
        Some(status) => {
            let message = body
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or("no error message");
            return Err(GeolocationError::Service(format!("{}: {}", status, message)));
        }
    }

    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| GeolocationError::Parse("response has no results array".to_string()))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    first
        .get("formatted_address")
        .and_then(Value::as_str)
        .map(|address| Some(address.to_string()))
        .ok_or_else(|| GeolocationError::Parse("first result has no formatted_address".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_place_name_from_response() {
        let body = json!({
            "status": "OK",
            "results": [
                { "formatted_address": "Rynek Główny 1, Kraków, Poland" },
                { "formatted_address": "Kraków, Poland" }
            ]
        });
        assert_eq!(
            place_name_from_response(&body).unwrap(),
            Some("Rynek Główny 1, Kraków, Poland".to_string())
        );
    }

    #[test]
    fn test_place_name_zero_results() {
        let body = json!({ "status": "ZERO_RESULTS", "results": [] });
        assert_eq!(place_name_from_response(&body).unwrap(), None);

        let body = json!({ "results": [] });
        assert_eq!(place_name_from_response(&body).unwrap(), None);
    }

    #[test]
    fn test_place_name_service_error() {
        let body = json!({ "status": "REQUEST_DENIED", "error_message": "key required", "results": [] });
        assert!(matches!(
            place_name_from_response(&body),
            Err(GeolocationError::Service(msg)) if msg.contains("REQUEST_DENIED")
        ));
    }

    #[test]
    fn test_place_name_malformed() {
        assert!(matches!(
            place_name_from_response(&json!({ "status": "OK" })),
            Err(GeolocationError::Parse(_))
        ));
        assert!(matches!(
            place_name_from_response(&json!({ "results": [ { "place_id": "x" } ] })),
            Err(GeolocationError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_reverse_queries_latlng_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("latlng", "50.06,19.94"))
            .and(query_param("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [ { "formatted_address": "Kraków, Poland" } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let geocoder = HttpGeocoder::new(
            &format!("{}/geocode/json", server.uri()),
            Some("secret".to_string()),
            DEFAULT_TIMEOUT,
        )
        .unwrap();

        let place = geocoder.reverse(Coordinates::new(50.06, 19.94)).await.unwrap();
        assert_eq!(place, Some("Kraków, Poland".to_string()));
    }

    #[tokio::test]
    async fn test_reverse_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let geocoder = HttpGeocoder::new(&server.uri(), None, DEFAULT_TIMEOUT).unwrap();

        let result = geocoder.reverse(Coordinates::new(1.0, 2.0)).await;
        assert!(matches!(result, Err(GeolocationError::Service(_))));
    }
}
