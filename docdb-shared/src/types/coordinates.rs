//! GPS coordinate pair read from image metadata or sent by the browser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
///
/// South latitudes and west longitudes are negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true for the `0, 0` location cameras write when they have no fix.
    pub fn is_zero(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
