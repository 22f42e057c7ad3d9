//! REST API implementation for the studyroom attendance service
//!
//! Thin axum handlers over the attendance service and the repository
//! traits. All aggregation happens in `studyroom-core`; this crate only
//! parses requests, verifies credentials and renders structured errors.

pub mod app;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;

pub use app::{create_rest_app, AppConfig};
pub use context::AttendanceContext;
pub use errors::{RestError, RestResult};
