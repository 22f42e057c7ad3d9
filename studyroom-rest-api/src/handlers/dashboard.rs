//! Per-user dashboard endpoint

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{context::AttendanceContext, errors::RestResult};

/// Full dashboard for one user: per-range totals and ranks, daily trend
/// and recent sessions
pub async fn get_dashboard(
    State(ctx): State<AttendanceContext>,
    Path(user_id): Path<i32>,
) -> RestResult<impl IntoResponse> {
    let dashboard = ctx.service.dashboard(user_id).await?;
    Ok(Json(dashboard))
}
