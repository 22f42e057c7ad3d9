//! Leaderboard endpoint

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use studyroom_api_types::TimeRange;

use crate::{
    context::AttendanceContext,
    errors::{RestError, RestResult},
    models::attendance::LeaderboardQuery,
};

/// Leaderboard over a named range
pub async fn get_leaderboard(
    State(ctx): State<AttendanceContext>,
    Query(query): Query<LeaderboardQuery>,
) -> RestResult<impl IntoResponse> {
    let range = match query.range.as_deref() {
        Some(raw) => TimeRange::from_str(raw).map_err(RestError::validation_error)?,
        None => TimeRange::Today,
    };
    let top = query.top.unwrap_or(ctx.default_leaderboard_top);

    let board = ctx.service.leaderboard(range, top).await?;
    Ok(Json(board))
}
