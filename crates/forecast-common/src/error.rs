//! Error types for forecast services.

use forecast_protocol::{ErrorCode, ExceptionResponse};
use thiserror::Error;

/// Why an event was rejected before any forecast lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEventReason {
    #[error("Event has already ended!")]
    EventEnded,

    #[error("Event must be at most {max_days} days away!")]
    EventTooFarAhead { max_days: i64 },
}

/// Primary error type for forecast operations.
///
/// `Clone` so a single upstream failure can be handed to every caller
/// waiting on the same in-flight fetch.
#[derive(Debug, Clone, Error)]
pub enum ForecastError {
    // === Client Errors ===
    #[error("{0}")]
    InvalidEvent(#[from] InvalidEventReason),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    NotFound(String),

    // === Upstream Errors ===
    #[error("Failed to retrieve forecast data: {0}")]
    UpstreamUnavailable(String),

    #[error("Forecast contains no timeseries samples")]
    EmptyTimeseries,
}

impl ForecastError {
    /// Get the API error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ForecastError::InvalidEvent(_) | ForecastError::InvalidParameter(_) => {
                ErrorCode::ValidationError
            }
            ForecastError::NotFound(_) => ErrorCode::NotFound,
            ForecastError::UpstreamUnavailable(_) | ForecastError::EmptyTimeseries => {
                ErrorCode::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        self.error_code().status_code()
    }

    /// Convert to the API error body. The message is the error text verbatim.
    pub fn to_exception(&self) -> ExceptionResponse {
        ExceptionResponse::new(self.error_code(), self.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::UpstreamUnavailable(format!("malformed forecast payload: {}", err))
    }
}
