//! Context types for dependency injection in REST API handlers
//!
//! A single context struct groups the dependencies every endpoint needs.
//! Handlers receive it via axum state, which keeps them testable with mock
//! repository factories.

use std::sync::Arc;

use studyroom_core::AttendanceService;
use studyroom_interfaces::RepositoryFactory;

/// Context for attendance endpoints
#[derive(Clone)]
pub struct AttendanceContext {
    /// Repository factory for database operations
    pub repositories: Arc<dyn RepositoryFactory>,
    /// The attendance aggregation service
    pub service: Arc<AttendanceService>,
    /// Leaderboard size when the caller does not ask for one
    pub default_leaderboard_top: usize,
}

impl AttendanceContext {
    pub fn new(
        repositories: Arc<dyn RepositoryFactory>,
        service: Arc<AttendanceService>,
        default_leaderboard_top: usize,
    ) -> Self {
        Self {
            repositories,
            service,
            default_leaderboard_top,
        }
    }
}
