//! Attendance service error types

use studyroom_interfaces::DatabaseError;
use thiserror::Error;

/// Errors surfaced by the attendance service.
///
/// Validation, NotFound and Conflict are distinct business outcomes the
/// presentation layer renders differently; none of them are retried here.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            message: message.into(),
        }
    }
}
