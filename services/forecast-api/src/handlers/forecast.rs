//! Event forecast handler.

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use forecast_common::{parse_instant, Event, ForecastError};
use forecast_protocol::{media_types, ExceptionResponse};

use crate::state::AppState;

/// Query parameters for the event forecast endpoint.
///
/// Everything is optional here so that missing or malformed values are
/// reported in our own error format rather than by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQueryParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ForecastQueryParams {
    /// Bind the parameters into an [`Event`], checking them in order.
    pub fn to_event(&self) -> Result<Event, ForecastError> {
        let latitude = bind_coordinate("latitude", self.latitude.as_deref(), 90.0)?;
        let longitude = bind_coordinate("longitude", self.longitude.as_deref(), 180.0)?;
        let start_time = bind_instant("startTime", self.start_time.as_deref())?;
        let end_time = bind_instant("endTime", self.end_time.as_deref())?;

        Ok(Event::new(latitude, longitude, start_time, end_time))
    }
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ForecastError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim()),
        _ => Err(ForecastError::InvalidParameter(format!(
            "Required request parameter '{}' is not present",
            name
        ))),
    }
}

fn bind_coordinate(name: &str, value: Option<&str>, limit: f64) -> Result<f64, ForecastError> {
    let raw = required(name, value)?;
    let parsed: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Parameter '{}': failed to convert '{}' to a number",
                name, raw
            ))
        })?;

    if !(-limit..=limit).contains(&parsed) {
        return Err(ForecastError::InvalidParameter(format!(
            "Parameter '{}' must be between {} and {}",
            name, -limit, limit
        )));
    }
    Ok(parsed)
}

fn bind_instant(name: &str, value: Option<&str>) -> Result<DateTime<Utc>, ForecastError> {
    let raw = required(name, value)?;
    parse_instant(raw).map_err(|_| {
        ForecastError::InvalidParameter(format!(
            "Parameter '{}': failed to convert '{}' to an instant",
            name, raw
        ))
    })
}

/// GET /api/event/forecast
pub async fn event_forecast_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<ForecastQueryParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return error_response(&ForecastError::InvalidParameter(rejection.body_text()));
        }
    };

    let event = match params.to_event() {
        Ok(event) => event,
        Err(e) => return error_response(&e),
    };

    match state.resolver.find_forecast(&event).await {
        Ok(forecast) => Json(forecast).into_response(),
        Err(e) => {
            if e.http_status_code() >= 500 {
                tracing::error!(error = %e, "Forecast lookup failed");
            } else {
                tracing::debug!(error = %e, "Forecast request rejected");
            }
            error_response(&e)
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: Uri) -> Response {
    error_response(&ForecastError::NotFound(format!(
        "No resource found for {}",
        uri.path()
    )))
}

pub(crate) fn error_response(err: &ForecastError) -> Response {
    exception_response(err.to_exception())
}

pub(crate) fn exception_response(exc: ExceptionResponse) -> Response {
    let status =
        StatusCode::from_u16(exc.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let json = serde_json::to_string(&exc).unwrap_or_default();
    (status, [(header::CONTENT_TYPE, media_types::JSON)], json).into_response()
}
