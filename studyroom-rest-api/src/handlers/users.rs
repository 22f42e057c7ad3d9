//! Administrative user management endpoints
//!
//! These routes carry no session protocol of their own; deployments are
//! expected to front them with their own authentication.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use bcrypt::DEFAULT_COST;
use tracing::{error, info};

use crate::{
    context::AttendanceContext,
    errors::{RestError, RestResult},
    models::attendance::{CreateUserRequest, ForceCheckoutResponse, ResetPinRequest, UserListResponse},
};

/// How many users the admin listing returns at most
const USER_LIST_LIMIT: u64 = 500;

/// List users, newest first
pub async fn list_users(State(ctx): State<AttendanceContext>) -> RestResult<impl IntoResponse> {
    let users = ctx.repositories.user_repository().list_users(USER_LIST_LIMIT).await?;
    Ok(Json(UserListResponse { ok: true, users }))
}

/// Create a user account
pub async fn create_user(
    State(ctx): State<AttendanceContext>,
    Json(request): Json<CreateUserRequest>,
) -> RestResult<impl IntoResponse> {
    request.validate().map_err(RestError::validation_error)?;

    let pin_hash = hash_pin(&request.pin)?;
    let user = ctx
        .repositories
        .user_repository()
        .create_user(&request.student_no, &request.name, &request.nickname, &pin_hash)
        .await?;

    info!(student_no = %user.student_no, "user created");
    Ok(Json(user))
}

/// Reset a user's PIN
pub async fn reset_pin(
    State(ctx): State<AttendanceContext>,
    Path(student_no): Path<String>,
    Json(request): Json<ResetPinRequest>,
) -> RestResult<impl IntoResponse> {
    request.validate().map_err(RestError::validation_error)?;

    let pin_hash = hash_pin(&request.new_pin)?;
    ctx.repositories
        .user_repository()
        .update_pin_hash(&student_no, &pin_hash)
        .await?;

    info!(student_no = %student_no, "PIN reset");
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Close a user's open session administratively.
///
/// Behaves exactly like a normal checkout; 409 when no session is open.
pub async fn force_checkout(
    State(ctx): State<AttendanceContext>,
    Path(student_no): Path<String>,
) -> RestResult<impl IntoResponse> {
    let user = ctx
        .repositories
        .user_repository()
        .find_by_student_no(&student_no)
        .await?
        .ok_or_else(|| RestError::not_found("user", &student_no))?;

    let user_id = super::attendance::parse_user_id(&user)?;
    let session = ctx.service.force_check_out(user_id).await?;

    Ok(Json(ForceCheckoutResponse {
        ok: true,
        duration_sec: session.duration_sec.unwrap_or(0),
    }))
}

fn hash_pin(pin: &str) -> Result<String, RestError> {
    bcrypt::hash(pin, DEFAULT_COST).map_err(|e| {
        error!("PIN hashing failed: {}", e);
        RestError::internal_error("failed to hash PIN")
    })
}
