//! Cache and request addressing for forecast locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places kept for coordinates, matching the upstream request URL.
pub const COORDINATE_PRECISION: usize = 6;

/// Key identifying a forecast location.
///
/// Coordinates are normalised to their fixed 6-decimal representation, so
/// two requests that would produce the same upstream URL share one cache
/// entry. Values that round to zero are written without a sign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    latitude: String,
    longitude: String,
}

impl LocationKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: format_coordinate(latitude),
            longitude: format_coordinate(longitude),
        }
    }

    /// Latitude as sent upstream, e.g. `"60.050000"`.
    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// Longitude as sent upstream, e.g. `"10.870000"`.
    pub fn longitude(&self) -> &str {
        &self.longitude
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

fn format_coordinate(value: f64) -> String {
    let formatted = format!("{:.*}", COORDINATE_PRECISION, value);

    // Anything that rounds to zero loses its sign
    match formatted.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => formatted,
    }
}
