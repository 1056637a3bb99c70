//! met.no locationforecast 2.0 payload types.
//!
//! Mirrors the GeoJSON-style envelope returned by the `compact` endpoint.
//! Every field the forecast engine does not strictly need is optional, and
//! unknown fields are ignored, so schema additions upstream never break
//! decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level forecast document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherData {
    /// GeoJSON feature type (always "Feature" upstream).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Point the forecast was computed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    /// Forecast metadata and samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl WeatherData {
    /// Forecast samples, or an empty slice if the payload carries none.
    pub fn timeseries(&self) -> &[Timeseries] {
        self.properties
            .as_ref()
            .map(|p| p.timeseries.as_slice())
            .unwrap_or(&[])
    }

    /// Sample instants in payload order.
    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.timeseries().iter().map(|t| t.time).collect()
    }
}

/// GeoJSON point geometry: `[lon, lat, altitude]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub type_: String,

    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Forecast properties block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Samples in ascending time order.
    #[serde(default)]
    pub timeseries: Vec<Timeseries>,
}

/// Model run metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
}

/// Units for each reported measurement (e.g. "celsius", "m/s").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Units {
    pub air_pressure_at_sea_level: Option<String>,
    pub air_temperature: Option<String>,
    pub cloud_area_fraction: Option<String>,
    pub precipitation_amount: Option<String>,
    pub relative_humidity: Option<String>,
    pub wind_from_direction: Option<String>,
    pub wind_speed: Option<String>,
}

/// A single forecast sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timeseries {
    pub time: DateTime<Utc>,

    #[serde(default)]
    pub data: TimeseriesData,
}

/// Instantaneous values plus optional period summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesData {
    #[serde(default)]
    pub instant: InstantData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_1_hours: Option<PeriodForecast>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_6_hours: Option<PeriodForecast>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_12_hours: Option<PeriodForecast>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstantData {
    #[serde(default)]
    pub details: Details,
}

/// Instantaneous measurements. Any of them may be missing upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Details {
    pub air_pressure_at_sea_level: Option<f64>,
    pub air_temperature: Option<f64>,
    pub cloud_area_fraction: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub wind_from_direction: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Summary for the period following a sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodForecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<PeriodSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PeriodDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub symbol_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodDetails {
    pub precipitation_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPACT_SAMPLE: &str = r#"{
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [10.87, 60.05, 190] },
        "properties": {
            "meta": {
                "updated_at": "2024-11-28T13:34:26Z",
                "units": {
                    "air_pressure_at_sea_level": "hPa",
                    "air_temperature": "celsius",
                    "cloud_area_fraction": "%",
                    "precipitation_amount": "mm",
                    "relative_humidity": "%",
                    "wind_from_direction": "degrees",
                    "wind_speed": "m/s"
                }
            },
            "timeseries": [
                {
                    "time": "2024-11-28T14:00:00Z",
                    "data": {
                        "instant": {
                            "details": {
                                "air_pressure_at_sea_level": 1012.3,
                                "air_temperature": -10.0,
                                "cloud_area_fraction": 88.1,
                                "relative_humidity": 91.0,
                                "wind_from_direction": 210.4,
                                "wind_speed": 3.6
                            }
                        },
                        "next_1_hours": {
                            "summary": { "symbol_code": "cloudy" },
                            "details": { "precipitation_amount": 0.0 }
                        }
                    }
                },
                {
                    "time": "2024-11-28T15:00:00Z",
                    "data": { "instant": { "details": { "air_temperature": -9.5 } } }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_compact_payload() {
        let data: WeatherData = serde_json::from_str(COMPACT_SAMPLE).unwrap();

        assert_eq!(data.type_.as_deref(), Some("Feature"));
        assert_eq!(data.geometry.as_ref().unwrap().coordinates.len(), 3);
        assert_eq!(data.timeseries().len(), 2);

        let first = &data.timeseries()[0];
        assert_eq!(first.data.instant.details.air_temperature, Some(-10.0));
        assert_eq!(first.data.instant.details.wind_speed, Some(3.6));
        let next = first.data.next_1_hours.as_ref().unwrap();
        assert_eq!(
            next.summary.as_ref().unwrap().symbol_code.as_deref(),
            Some("cloudy")
        );

        let units = data.properties.as_ref().unwrap().meta.as_ref().unwrap().units.as_ref().unwrap();
        assert_eq!(units.wind_speed.as_deref(), Some("m/s"));
    }

    #[test]
    fn test_missing_measurements_are_none() {
        let data: WeatherData = serde_json::from_str(COMPACT_SAMPLE).unwrap();
        let second = &data.timeseries()[1].data.instant.details;

        assert_eq!(second.air_temperature, Some(-9.5));
        assert_eq!(second.wind_speed, None);
    }

    #[test]
    fn test_missing_properties_yields_empty_timeseries() {
        let data: WeatherData = serde_json::from_str(r#"{"type": "Feature"}"#).unwrap();
        assert!(data.timeseries().is_empty());
        assert!(data.times().is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{
            "properties": {
                "timeseries": [
                    { "time": "2024-11-28T14:00:00Z", "data": { "instant": { "details": { "dew_point_temperature": 1.0 } } } }
                ],
                "extra": true
            }
        }"#;
        let data: WeatherData = serde_json::from_str(json).unwrap();
        assert_eq!(data.timeseries().len(), 1);
        assert_eq!(data.timeseries()[0].data.instant.details, Details::default());
    }
}
