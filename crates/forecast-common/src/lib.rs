//! Common types for event forecast services.

pub mod error;
pub mod event;
pub mod location;
pub mod time;

pub use error::{ForecastError, InvalidEventReason};
pub use event::{Event, ForecastResult, DEFAULT_MAX_LEAD_DAYS};
pub use location::LocationKey;
pub use time::{closest_index, closest_time, parse_instant, TimeParseError};
