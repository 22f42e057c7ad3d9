//! Database repository interfaces
//!
//! These traits define the contract between the attendance engine and the
//! session store. The store owns raw rows; everything derived (totals,
//! ranks, series) is computed by the engine from what these traits return.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studyroom_api_types::{SessionSpan, UnifiedSession, UnifiedUser};

/// Common database error type
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    #[error("Internal database error: {message}")]
    Internal { message: String },
}

/// Base repository trait with health check capability
#[async_trait]
pub trait Repository: Send + Sync {
    /// Check if the repository is healthy and can serve requests
    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// User repository interface
#[async_trait]
pub trait UserRepository: Repository {
    /// Create a new user with a pre-hashed PIN.
    ///
    /// Fails with [`DatabaseError::Constraint`] when the student number is
    /// already registered.
    async fn create_user(
        &self,
        student_no: &str,
        name: &str,
        nickname: &str,
        pin_hash: &str,
    ) -> Result<UnifiedUser, DatabaseError>;

    /// Find user by integer ID
    async fn find_by_id(&self, id: i32) -> Result<Option<UnifiedUser>, DatabaseError>;

    /// Find user by student number
    async fn find_by_student_no(&self, student_no: &str) -> Result<Option<UnifiedUser>, DatabaseError>;

    /// Stored PIN hash for credential verification, by student number
    async fn pin_hash_by_student_no(&self, student_no: &str) -> Result<Option<String>, DatabaseError>;

    /// List users, newest first
    async fn list_users(&self, limit: u64) -> Result<Vec<UnifiedUser>, DatabaseError>;

    /// Replace a user's PIN hash
    async fn update_pin_hash(&self, student_no: &str, pin_hash: &str) -> Result<(), DatabaseError>;

    /// Get total count of users
    async fn count(&self) -> Result<u64, DatabaseError>;
}

/// Attendance session repository interface
#[async_trait]
pub trait SessionRepository: Repository {
    /// Insert a new open session (check-in).
    ///
    /// The store must guarantee at most one open session per user: a second
    /// insert while one is open fails with [`DatabaseError::Constraint`]
    /// even under concurrent requests.
    async fn insert_checkin(&self, user_id: i32, checkin_at: DateTime<Utc>) -> Result<UnifiedSession, DatabaseError>;

    /// Find the single open session for a user, if any
    async fn find_open_for_user(&self, user_id: i32) -> Result<Option<UnifiedSession>, DatabaseError>;

    /// Close a session: set checkout time and duration in one update
    async fn close_session(
        &self,
        session_id: i32,
        checkout_at: DateTime<Utc>,
        duration_sec: i64,
    ) -> Result<UnifiedSession, DatabaseError>;

    /// Fetch all sessions overlapping `[start, end)`, joined with the
    /// owner's nickname, optionally filtered to one user.
    ///
    /// The predicate is `checkin < end AND (checkout IS NULL OR
    /// checkout > start)`, which includes sessions that started before the
    /// window and sessions still open past it.
    async fn find_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_id: Option<i32>,
    ) -> Result<Vec<SessionSpan>, DatabaseError>;

    /// Sum of `duration_sec` over a user's closed sessions
    async fn sum_closed_durations(&self, user_id: i32) -> Result<i64, DatabaseError>;

    /// Most recent sessions for a user, newest first
    async fn recent_for_user(&self, user_id: i32, limit: u64) -> Result<Vec<UnifiedSession>, DatabaseError>;

    /// Number of currently open sessions (room occupancy)
    async fn count_open(&self) -> Result<u64, DatabaseError>;
}

/// Factory for accessing all repositories
///
/// Enables dependency injection: handlers and the service receive a single
/// factory instead of individual repository instances.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Get user repository instance
    fn user_repository(&self) -> &dyn UserRepository;

    /// Get session repository instance
    fn session_repository(&self) -> &dyn SessionRepository;

    /// Check health of all repositories
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
