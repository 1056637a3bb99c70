//! Common test fixtures for forecast tests.
//!
//! This module provides pre-defined data that mirrors what met.no returns
//! for a compact forecast.

use chrono::{DateTime, Duration, Utc};

/// Common coordinates for testing.
pub mod coords {
    /// Near Oslo, Norway (lat, lon)
    pub const OSLO: (f64, f64) = (60.05, 10.87);

    /// Arbitrary round coordinates (lat, lon)
    pub const ROUND: (f64, f64) = (10.0, 20.0);

    /// Null island
    pub const NULL_ISLAND: (f64, f64) = (0.0, 0.0);
}

/// First sample of the compact structure.
pub const COMPACT_FIRST: &str = "2024-11-28T14:00:00Z";

/// Last hourly sample before the series switches to 6-hour spacing.
pub const COMPACT_LAST_HOURLY: &str = "2024-11-30T18:00:00Z";

/// Last sample of the compact structure.
pub const COMPACT_LAST: &str = "2024-12-08T06:00:00Z";

/// Sample instants of a compact forecast issued on 2024-11-28.
///
/// Hourly from [`COMPACT_FIRST`] to [`COMPACT_LAST_HOURLY`], then every
/// 6 hours up to [`COMPACT_LAST`].
pub fn compact_time_structure() -> Vec<DateTime<Utc>> {
    let first = instant(COMPACT_FIRST);
    let last_hourly = instant(COMPACT_LAST_HOURLY);
    let last = instant(COMPACT_LAST);

    let mut times = Vec::new();
    let mut t = first;
    while t <= last_hourly {
        times.push(t);
        t += Duration::hours(1);
    }
    t = last_hourly + Duration::hours(6);
    while t <= last {
        times.push(t);
        t += Duration::hours(6);
    }
    times
}

/// Parse an RFC 3339 literal, panicking on bad input.
pub fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap_or_else(|e| panic!("bad fixture instant {}: {}", s, e))
        .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_structure_shape() {
        let times = compact_time_structure();

        assert_eq!(times.first().copied(), Some(instant(COMPACT_FIRST)));
        assert_eq!(times.last().copied(), Some(instant(COMPACT_LAST)));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert!(times.contains(&instant("2024-12-01T00:00:00Z")));
        assert!(!times.contains(&instant("2024-11-30T19:00:00Z")));
    }
}
