//! Time handling: nearest-sample lookup and instant parsing.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::error::ForecastError;

/// Find the index of the sample closest to `target`.
///
/// `times` must be in strictly ascending order. An exact match wins outright.
/// Otherwise the neighbours on either side of the insertion point are
/// compared, and an equal distance resolves to the earlier sample. Targets
/// before the first or after the last sample clamp to that sample.
pub fn closest_index(times: &[DateTime<Utc>], target: DateTime<Utc>) -> Result<usize, ForecastError> {
    if times.is_empty() {
        return Err(ForecastError::EmptyTimeseries);
    }

    let insertion_point = match times.binary_search(&target) {
        Ok(exact) => return Ok(exact),
        Err(point) => point,
    };

    if insertion_point == 0 {
        return Ok(0);
    }
    if insertion_point == times.len() {
        return Ok(times.len() - 1);
    }

    let before = insertion_point - 1;
    let before_delta = target - times[before];
    let after_delta = times[insertion_point] - target;

    if before_delta <= after_delta {
        Ok(before)
    } else {
        Ok(insertion_point)
    }
}

/// Find the sample instant closest to `target`.
pub fn closest_time(times: &[DateTime<Utc>], target: DateTime<Utc>) -> Result<DateTime<Utc>, ForecastError> {
    closest_index(times, target).map(|i| times[i])
}

/// Parse an instant from a request parameter.
///
/// Accepts RFC 3339 (`2024-11-28T20:00:00Z`, `2024-11-28T21:00:00+01:00`)
/// and, assuming UTC, a bare `2024-11-28T20:00:00`.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}
