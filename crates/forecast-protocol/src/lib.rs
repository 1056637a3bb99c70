//! Event Forecast Protocol
//!
//! Wire types shared by the forecast services:
//! - [`met`]: the met.no *locationforecast 2.0 compact* payload consumed upstream
//! - [`responses`]: the error body returned by the inbound API
//!
//! # Example
//!
//! ```rust
//! use forecast_protocol::{ErrorCode, ExceptionResponse};
//!
//! let body = ExceptionResponse::validation_error("Event has already ended!");
//! assert_eq!(body.code, ErrorCode::ValidationError);
//! ```

pub mod met;
pub mod responses;

// Re-export commonly used types
pub use met::{Details, Geometry, InstantData, Meta, Properties, Timeseries, TimeseriesData, WeatherData};
pub use responses::{ErrorCode, ExceptionResponse};

/// Media types used in API responses
pub mod media_types {
    /// JSON media type
    pub const JSON: &str = "application/json";
    /// Prometheus text exposition format
    pub const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";
}
