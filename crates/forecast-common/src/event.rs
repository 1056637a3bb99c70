//! Events and the forecast produced for them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidEventReason;
use crate::location::LocationKey;

/// Default maximum lead time between now and an event's start.
pub const DEFAULT_MAX_LEAD_DAYS: i64 = 7;

/// Time and place a forecast is wanted for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Event {
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            start_time,
            end_time,
        }
    }

    pub fn location_key(&self) -> LocationKey {
        LocationKey::new(self.latitude, self.longitude)
    }

    /// Check that the event can still be forecast at `now`.
    ///
    /// Only the temporal window is checked: the event must not have ended,
    /// and must start no later than `max_lead_days` from now. Events that
    /// already started but are still running are accepted, as is any
    /// coordinate pair.
    pub fn validate(&self, now: DateTime<Utc>, max_lead_days: i64) -> Result<(), InvalidEventReason> {
        if self.end_time < now {
            return Err(InvalidEventReason::EventEnded);
        }

        // A horizon past the representable range cannot be exceeded
        let horizon = Duration::try_days(max_lead_days).and_then(|d| now.checked_add_signed(d));
        if matches!(horizon, Some(horizon) if self.start_time > horizon) {
            return Err(InvalidEventReason::EventTooFarAhead {
                max_days: max_lead_days,
            });
        }

        Ok(())
    }
}

/// Measurements of the sample closest to an event's start.
///
/// Missing upstream values stay `None` and serialise as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub air_temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}
