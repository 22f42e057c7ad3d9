//! Unified API types for the studyroom attendance service
//!
//! This crate provides consistent type definitions shared by the aggregation
//! engine, the storage layer and the REST API, reducing duplication and
//! ensuring API consistency.

pub mod domain;
pub mod enums;
pub mod errors;
pub mod ids;

// Re-export main types for convenience
pub use domain::{
    CumulativePoint, DailyPoint, Leaderboard, LeaderboardEntry, RangeRanks, RangeTotals, RankSummary, SessionSpan,
    UnifiedSession, UnifiedUser, UserDashboard,
};
pub use enums::TimeRange;
pub use errors::ApiError;
pub use ids::ApiId;
