//! Main application configuration and router setup

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{context::AttendanceContext, handlers};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable CORS middleware
    pub enable_cors: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// API path prefix
    pub api_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// Create the complete REST API application
pub fn create_rest_app(context: AttendanceContext, config: AppConfig) -> Router {
    let app = Router::new()
        // Health endpoints (no prefix)
        .route("/health", get(handlers::health_check))
        .route("/health/detailed", get(handlers::health_check_detailed))
        // API routes with prefix
        .nest(&config.api_prefix, create_api_router())
        // Add application context
        .with_state(context);

    // Add middleware layers (applied in reverse order)
    let mut app = app;
    if config.enable_cors {
        app = app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
    }

    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Create the API router
fn create_api_router() -> Router<AttendanceContext> {
    Router::new()
        // Attendance endpoints
        .route("/attendance/checkin", post(handlers::check_in))
        .route("/attendance/checkout", post(handlers::check_out))
        // Leaderboard
        .route("/leaderboard", get(handlers::get_leaderboard))
        // Dashboard
        .route("/users/{id}/dashboard", get(handlers::get_dashboard))
        // Admin endpoints
        .route("/admin/users", get(handlers::list_users).post(handlers::create_user))
        .route("/admin/users/{student_no}/reset-pin", post(handlers::reset_pin))
        .route("/admin/users/{student_no}/force-checkout", post(handlers::force_checkout))
}
