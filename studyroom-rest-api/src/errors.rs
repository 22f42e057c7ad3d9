//! REST API specific error types and conversions

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use studyroom_api_types::ApiError;
use studyroom_core::ServiceError;
use studyroom_interfaces::DatabaseError;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error")]
    Database(#[from] DatabaseError),

    #[error("Service error")]
    Service(#[from] ServiceError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        // Convert to the unified error first, then to the HTTP envelope
        let unified_error = self.to_unified_error();
        let status =
            StatusCode::from_u16(unified_error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_response = json!({
            "error": {
                "code": unified_error.code,
                "message": unified_error.message,
                "status": status.as_u16()
            }
        });
        (status, Json(error_response)).into_response()
    }
}

impl RestError {
    /// Convert to unified API error
    pub fn to_unified_error(&self) -> ApiError {
        match self {
            RestError::NotFound(msg) => ApiError::not_found("resource", msg.clone()),
            RestError::BadRequest(msg) => ApiError::bad_request(msg.clone()),
            RestError::Unauthorized(msg) => ApiError::unauthorized(msg.clone()),
            RestError::Conflict(msg) => ApiError::conflict("resource", msg.clone()),
            RestError::InternalError(msg) => ApiError::internal_error(msg.clone()),
            RestError::Validation { message } => ApiError::validation_error("input", message.clone()),
            RestError::Database(db_err) => match db_err {
                DatabaseError::NotFound { entity, id } => ApiError::not_found(entity, id.clone()),
                DatabaseError::Constraint { message } => ApiError::conflict("resource", message.clone()),
                DatabaseError::Validation { message } => ApiError::validation_error("input", message.clone()),
                other => ApiError::internal_error(format!("Database error: {}", other)),
            },
            RestError::Service(svc_err) => match svc_err {
                ServiceError::Validation { message } => ApiError::validation_error("input", message.clone()),
                ServiceError::NotFound { entity, id } => ApiError::not_found(entity, id.clone()),
                ServiceError::Conflict { message } => ApiError::conflict("attendance", message.clone()),
                ServiceError::Database(db) => ApiError::internal_error(format!("Database error: {}", db)),
            },
        }
    }

    // Common error constructors
    pub fn not_found(resource: &str, id: &str) -> Self {
        RestError::NotFound(format!("{} with ID '{}' not found", resource, id))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        RestError::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RestError::Conflict(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        RestError::InternalError(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        RestError::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_conflict_maps_to_409() {
        let err = RestError::from(ServiceError::conflict("already checked in"));
        assert_eq!(err.to_unified_error().http_status_code(), 409);
    }

    #[test]
    fn test_service_not_found_maps_to_404() {
        let err = RestError::from(ServiceError::not_found("user", 7));
        assert_eq!(err.to_unified_error().http_status_code(), 404);
    }

    #[test]
    fn test_database_constraint_maps_to_409() {
        let err = RestError::from(DatabaseError::Constraint {
            message: "duplicate".to_string(),
        });
        assert_eq!(err.to_unified_error().http_status_code(), 409);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let err = RestError::unauthorized("bad pin");
        assert_eq!(err.to_unified_error().http_status_code(), 401);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = RestError::validation_error("pin too short");
        assert_eq!(err.to_unified_error().http_status_code(), 400);
    }
}
