//! Event forecast resolution.

use chrono::{DateTime, Utc};
use tracing::debug;

use forecast_common::{closest_index, Event, ForecastError, ForecastResult};

use crate::forecast_cache::ForecastCache;

/// Resolves an [`Event`] to the forecast sample nearest its start.
#[derive(Clone)]
pub struct ForecastResolver {
    cache: ForecastCache,
    max_lead_days: i64,
}

impl ForecastResolver {
    pub fn new(cache: ForecastCache, max_lead_days: i64) -> Self {
        Self {
            cache,
            max_lead_days,
        }
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }

    /// Find the forecast for `event` as of now.
    pub async fn find_forecast(&self, event: &Event) -> Result<ForecastResult, ForecastError> {
        self.find_forecast_at(event, Utc::now()).await
    }

    /// Find the forecast for `event`, validating it against `now`.
    ///
    /// Validation happens before the cache is consulted, so a rejected
    /// event never causes an upstream call. Missing measurements are
    /// passed through as `None`.
    pub async fn find_forecast_at(
        &self,
        event: &Event,
        now: DateTime<Utc>,
    ) -> Result<ForecastResult, ForecastError> {
        event.validate(now, self.max_lead_days)?;

        let data = self.cache.get(&event.location_key()).await?;
        let idx = closest_index(&data.times(), event.start_time)?;
        let sample = &data.timeseries()[idx];
        debug!(
            start_time = %event.start_time,
            sample_time = %sample.time,
            "Selected closest forecast sample"
        );

        let details = &sample.data.instant.details;
        Ok(ForecastResult {
            air_temperature: details.air_temperature,
            wind_speed: details.wind_speed,
        })
    }
}
