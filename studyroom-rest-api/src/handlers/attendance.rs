//! Check-in / check-out endpoints
//!
//! Credentials are verified per request against the stored bcrypt hash,
//! exactly like the kiosk flow: no cookies, no server-side login state.

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{info, warn};

use studyroom_api_types::UnifiedUser;

use crate::{
    context::AttendanceContext,
    errors::{RestError, RestResult},
    models::attendance::{CheckRequest, CheckResponse},
};

/// Check a user into the study room
pub async fn check_in(
    State(ctx): State<AttendanceContext>,
    Json(request): Json<CheckRequest>,
) -> RestResult<impl IntoResponse> {
    request.validate().map_err(RestError::validation_error)?;
    let user = verify_credentials(&ctx, &request.student_no, &request.pin).await?;

    let user_id = parse_user_id(&user)?;
    let session = ctx.service.check_in(user_id).await?;

    let local = session.checkin_at.with_timezone(&ctx.service.resolver().tz());
    info!(user_id, "check-in accepted");
    Ok(Json(CheckResponse {
        ok: true,
        message: format!("{} checked in at {}", user.nickname, local.format("%H:%M:%S")),
        session,
    }))
}

/// Check a user out of the study room
pub async fn check_out(
    State(ctx): State<AttendanceContext>,
    Json(request): Json<CheckRequest>,
) -> RestResult<impl IntoResponse> {
    request.validate().map_err(RestError::validation_error)?;
    let user = verify_credentials(&ctx, &request.student_no, &request.pin).await?;

    let user_id = parse_user_id(&user)?;
    let session = ctx.service.check_out(user_id).await?;

    let minutes = session.duration_sec.unwrap_or(0) / 60;
    let local = session
        .checkout_at
        .unwrap_or(session.checkin_at)
        .with_timezone(&ctx.service.resolver().tz());
    info!(user_id, "check-out accepted");
    Ok(Json(CheckResponse {
        ok: true,
        message: format!(
            "{} checked out at {} after {} min",
            user.nickname,
            local.format("%H:%M:%S"),
            minutes
        ),
        session,
    }))
}

/// Verify a student number + PIN pair against the stored hash.
///
/// Unknown student numbers and wrong PINs produce the same response, so the
/// endpoint does not leak which accounts exist.
pub(crate) async fn verify_credentials(
    ctx: &AttendanceContext,
    student_no: &str,
    pin: &str,
) -> Result<UnifiedUser, RestError> {
    let users = ctx.repositories.user_repository();

    let user = users.find_by_student_no(student_no).await?;
    let pin_hash = users.pin_hash_by_student_no(student_no).await?;

    let (user, pin_hash) = match (user, pin_hash) {
        (Some(user), Some(hash)) => (user, hash),
        _ => {
            warn!(student_no, "credential check failed: unknown student number");
            return Err(RestError::unauthorized("invalid student number or PIN"));
        }
    };

    if !bcrypt::verify(pin, &pin_hash).unwrap_or(false) {
        warn!(student_no, "credential check failed: PIN mismatch");
        return Err(RestError::unauthorized("invalid student number or PIN"));
    }

    Ok(user)
}

pub(crate) fn parse_user_id(user: &UnifiedUser) -> Result<i32, RestError> {
    user.id
        .as_i32()
        .ok_or_else(|| RestError::internal_error("user id is not numeric"))
}
