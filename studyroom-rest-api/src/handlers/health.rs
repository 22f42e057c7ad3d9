//! Health check endpoints

use axum::{extract::State, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::{
    context::AttendanceContext,
    errors::RestResult,
    models::common::{HealthCheckResult, HealthResponse, HealthStatus},
};

/// Health check endpoint
///
/// Returns the overall health status of the API.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// Detailed health check with dependency checks
pub async fn health_check_detailed(State(ctx): State<AttendanceContext>) -> RestResult<impl IntoResponse> {
    let mut checks = HashMap::new();

    let repo_start = std::time::Instant::now();
    let repo_health = match ctx.repositories.health_check().await {
        Ok(_) => HealthCheckResult {
            status: HealthStatus::Healthy,
            message: Some("Database connection healthy".to_string()),
            duration_ms: Some(repo_start.elapsed().as_millis() as u64),
        },
        Err(e) => HealthCheckResult {
            status: HealthStatus::Unhealthy,
            message: Some(format!("Database connection failed: {}", e)),
            duration_ms: Some(repo_start.elapsed().as_millis() as u64),
        },
    };
    checks.insert("database".to_string(), repo_health);

    let response = HealthResponse::healthy().with_checks(checks);
    Ok(Json(response))
}
