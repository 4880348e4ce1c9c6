//! Socket frame types.
//!
//! Every frame on the search socket is one JSON object. Inbound frames carry a
//! `request` discriminator; outbound frames carry exactly one of `result`,
//! `location` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::coordinates::Coordinates;

/// Errors raised while decoding an inbound frame.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameError {
    /// The frame is not a JSON object.
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// A known request is missing a field or the field has the wrong type.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl FrameError {
    /// Create a malformed frame error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A request sent by the browser over the search socket.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRequest {
    /// `{"request": "search", "pattern": "...", "limit": "true"}`
    Search {
        pattern: String,
        /// The client's "limit" flag; parsed but not acted upon.
        limit: Option<bool>,
    },

    /// `{"request": "geolocation", "lat": 50.06, "lng": 19.94}`
    Geolocation { coordinates: Coordinates },
}

impl ClientRequest {
    /// Decode one inbound text frame.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(request))` - A recognised request
    /// * `Ok(None)` - The frame has no string `request` field, or names an unknown request;
    ///   such frames get no reply
    /// * `Err(FrameError)` - The frame is not a JSON object, or a recognised request has
    ///   missing or mistyped fields
    pub fn parse(text: &str) -> Result<Option<Self>, FrameError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| FrameError::malformed(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| FrameError::malformed("frame is not a JSON object"))?;

        let Some(request) = object.get("request").and_then(Value::as_str) else {
            return Ok(None);
        };

        match request {
            "search" => {
                let pattern = object
                    .get("pattern")
                    .and_then(Value::as_str)
                    .ok_or_else(|| FrameError::invalid_field("pattern", "expected a string"))?;
                Ok(Some(Self::Search {
                    pattern: pattern.to_string(),
                    limit: parse_flag(object.get("limit")),
                }))
            }
            "geolocation" => {
                let latitude = parse_degrees(object, "lat")?;
                let longitude = parse_degrees(object, "lng")?;
                Ok(Some(Self::Geolocation {
                    coordinates: Coordinates::new(latitude, longitude),
                }))
            }
            _ => Ok(None),
        }
    }
}

fn parse_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_degrees(object: &Map<String, Value>, field: &str) -> Result<f64, FrameError> {
    let degrees = match object.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| FrameError::invalid_field(field, "expected a number"))?;

    if !degrees.is_finite() {
        return Err(FrameError::invalid_field(field, "expected a finite number"));
    }
    Ok(degrees)
}

/// A frame written back to the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ServerFrame {
    /// Rendered search rows: `{"result": "<span ...>"}`.
    SearchResult { result: String },

    /// Resolved place name: `{"location": "..."}`.
    Location { location: String },

    /// A request could not be served: `{"error": "..."}`.
    Error { error: String },
}

impl ServerFrame {
    pub fn search_result(result: impl Into<String>) -> Self {
        Self::SearchResult {
            result: result.into(),
        }
    }

    pub fn location(location: impl Into<String>) -> Self {
        Self::Location {
            location: location.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Serialize the frame to its JSON text.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            // Every variant is a single string field.
            Err(_) => String::from("{}"),
        }
    }
}
