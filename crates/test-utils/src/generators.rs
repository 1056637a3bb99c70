//! Forecast payload generators.
//!
//! These generators create predictable, verifiable payloads so tests can
//! tell which sample a lookup picked just from the returned measurements.

use chrono::{DateTime, Utc};
use forecast_protocol::met::{
    Details, Geometry, InstantData, Meta, Properties, Timeseries, TimeseriesData, Units,
    WeatherData,
};

/// Creates a payload with one sample per instant.
///
/// Sample `i` carries `air_temperature = i` and `wind_speed = i / 10`, so
/// the chosen index can be read back from the measurements.
///
/// # Example
///
/// ```
/// use test_utils::{compact_time_structure, weather_data_for_times};
///
/// let data = weather_data_for_times(&compact_time_structure());
/// assert_eq!(data.timeseries()[3].data.instant.details.air_temperature, Some(3.0));
/// ```
pub fn weather_data_for_times(times: &[DateTime<Utc>]) -> WeatherData {
    weather_data_with(times, |i| Details {
        air_temperature: Some(i as f64),
        wind_speed: Some(i as f64 / 10.0),
        ..Default::default()
    })
}

/// Creates a payload whose sample details come from `details_for(index)`.
pub fn weather_data_with<F>(times: &[DateTime<Utc>], details_for: F) -> WeatherData
where
    F: Fn(usize) -> Details,
{
    let timeseries = times
        .iter()
        .enumerate()
        .map(|(i, &time)| Timeseries {
            time,
            data: TimeseriesData {
                instant: InstantData {
                    details: details_for(i),
                },
                ..Default::default()
            },
        })
        .collect();

    WeatherData {
        type_: Some("Feature".to_string()),
        geometry: Some(Geometry {
            type_: "Point".to_string(),
            coordinates: vec![10.87, 60.05, 190.0],
        }),
        properties: Some(Properties {
            meta: Some(Meta {
                updated_at: times.first().copied(),
                units: Some(Units {
                    air_temperature: Some("celsius".to_string()),
                    wind_speed: Some("m/s".to_string()),
                    ..Default::default()
                }),
            }),
            timeseries,
        }),
    }
}

/// Serialises a payload to the JSON body met.no would send.
pub fn weather_data_json(data: &WeatherData) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| panic!("failed to encode payload: {}", e))
}
