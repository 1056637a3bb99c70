//! API error response types.

use serde::{Deserialize, Serialize};

/// Machine-readable error category returned to API clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request was malformed or described an event we cannot forecast.
    ValidationError,
    /// No route matched the request.
    NotFound,
    /// Anything else, including upstream failures.
    InternalServerError,
}

impl ErrorCode {
    /// HTTP status code this category is served with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::InternalServerError => 500,
        }
    }
}

/// Error body: `{"code": "...", "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a 400 validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }

    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}
