//! Attendance and admin request/response models

use serde::{Deserialize, Serialize};
use studyroom_api_types::{UnifiedSession, UnifiedUser};

/// Check-in / check-out request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    /// External student identifier
    pub student_no: String,
    /// PIN for credential verification
    pub pin: String,
}

/// Check-in / check-out response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub ok: bool,
    /// Human-readable confirmation for the kiosk screen
    pub message: String,
    pub session: UnifiedSession,
}

/// Leaderboard query parameters
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Named range selector; defaults to `today`
    pub range: Option<String>,
    /// Number of entries to return
    pub top: Option<usize>,
}

/// Admin user creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub student_no: String,
    pub name: String,
    pub nickname: String,
    pub pin: String,
}

/// Admin PIN reset request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPinRequest {
    pub new_pin: String,
}

/// Admin user listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub ok: bool,
    pub users: Vec<UnifiedUser>,
}

/// Admin force-checkout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceCheckoutResponse {
    pub ok: bool,
    pub duration_sec: i64,
}

impl CheckRequest {
    /// Field-level validation matching the account creation bounds
    pub fn validate(&self) -> Result<(), String> {
        validate_student_no(&self.student_no)?;
        validate_pin(&self.pin)?;
        Ok(())
    }
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_student_no(&self.student_no)?;
        validate_length("name", &self.name, 1, 64)?;
        validate_length("nickname", &self.nickname, 1, 32)?;
        validate_pin(&self.pin)?;
        Ok(())
    }
}

impl ResetPinRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_pin(&self.new_pin)
    }
}

fn validate_student_no(value: &str) -> Result<(), String> {
    validate_length("studentNo", value, 1, 64)
}

fn validate_pin(value: &str) -> Result<(), String> {
    validate_length("pin", value, 4, 32)
}

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(format!("{} must be between {} and {} characters", field, min, max));
    }
    Ok(())
}
