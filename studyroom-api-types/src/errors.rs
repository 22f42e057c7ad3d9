//! Structured API error type shared by all API surfaces

use serde::{Deserialize, Serialize};

/// Unified API error with a stable machine-readable code.
///
/// The REST layer converts its internal error enums into this type before
/// rendering the HTTP response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    /// Stable error code, e.g. `NOT_FOUND`, `CONFLICT`
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn validation_error(field: &str, message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", format!("{}: {}", field, message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(entity: &str, message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("{}: {}", entity, message.into()))
    }

    pub fn conflict(entity: &str, message: impl Into<String>) -> Self {
        Self::new("CONFLICT", format!("{}: {}", entity, message.into()))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn service_unavailable(message: Option<impl Into<String>>) -> Self {
        Self::new(
            "SERVICE_UNAVAILABLE",
            message.map(Into::into).unwrap_or_else(|| "Service unavailable".to_string()),
        )
    }

    /// HTTP status code this error maps to
    pub fn http_status_code(&self) -> u16 {
        match self.code.as_str() {
            "BAD_REQUEST" | "VALIDATION_ERROR" => 400,
            "UNAUTHORIZED" => 401,
            "NOT_FOUND" => 404,
            "CONFLICT" => 409,
            "SERVICE_UNAVAILABLE" => 503,
            _ => 500,
        }
    }
}
