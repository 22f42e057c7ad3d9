use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::TimeRange;
use crate::ids::ApiId;

/// Unified User representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedUser {
    pub id: ApiId,
    /// External student identifier (unique)
    pub student_no: String,
    /// Display name
    pub name: String,
    /// Nickname shown on leaderboards
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    // PIN hash is never included in API responses
}

/// Unified attendance session representation
///
/// A session is one contiguous span of presence: check-in to check-out.
/// An open session has no `checkout_at` and no `duration_sec` yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSession {
    pub id: ApiId,
    pub user_id: ApiId,
    pub checkin_at: DateTime<Utc>,
    pub checkout_at: Option<DateTime<Utc>>,
    /// Whole seconds between check-in and check-out, set at checkout
    pub duration_sec: Option<i64>,
    pub is_active: bool,
}

/// Raw session row joined with the owner's nickname, as fetched for
/// aggregation. `checkout_at = None` means the session is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpan {
    pub user_id: i32,
    pub nickname: String,
    pub checkin_at: DateTime<Utc>,
    pub checkout_at: Option<DateTime<Utc>>,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub nickname: String,
    pub total_sec: i64,
}

/// Leaderboard over one resolved time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub range: TimeRange,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Number of currently open sessions
    pub occupancy: u64,
    /// Entries sorted by total seconds, descending
    pub items: Vec<LeaderboardEntry>,
    pub total_users: u64,
}

/// Competition-rank summary for one user within one window.
///
/// `rank = 1 + count(users with strictly greater totals)`; ties share rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankSummary {
    pub rank: u64,
    pub total_users: u64,
    pub my_sec: i64,
}

/// One day of a user's attendance series: seconds present and rank among
/// all users for that day alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sec: i64,
    pub rank: u64,
    pub total_users: u64,
}

/// Running sum of a user's daily seconds across a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub cum_sec: i64,
}

/// Per-range total seconds for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTotals {
    pub today: i64,
    pub week: i64,
    pub month: i64,
    pub all: i64,
}

/// Per-range rank summaries for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRanks {
    pub today: RankSummary,
    pub week: RankSummary,
    pub month: RankSummary,
    pub all: RankSummary,
}

/// Full dashboard payload for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboard {
    pub user: UnifiedUser,
    pub totals: RangeTotals,
    pub ranks: RangeRanks,
    /// Per-day seconds and rank over the trend window
    pub daily: Vec<DailyPoint>,
    /// Cumulative seconds over the trend window
    pub daily_cum: Vec<CumulativePoint>,
    /// Most recent sessions, newest first
    pub sessions: Vec<UnifiedSession>,
}

impl SessionSpan {
    /// Effective end of the span at evaluation time: the recorded checkout,
    /// or `now` for an open session.
    pub fn end_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.checkout_at.unwrap_or(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_span_end_or() {
        let now = Utc::now();
        let open = SessionSpan {
            user_id: 1,
            nickname: "mi".to_string(),
            checkin_at: now - chrono::Duration::hours(1),
            checkout_at: None,
        };
        assert_eq!(open.end_or(now), now);

        let closed = SessionSpan {
            checkout_at: Some(now - chrono::Duration::minutes(10)),
            ..open
        };
        assert_eq!(closed.end_or(now), now - chrono::Duration::minutes(10));
    }

    #[test]
    fn test_leaderboard_serializes_camel_case() {
        let entry = LeaderboardEntry {
            nickname: "mi".to_string(),
            total_sec: 5400,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["totalSec"], 5400);
    }
}
