//! Attendance service
//!
//! Orchestrates the engine over the repository traits: check-in/out,
//! leaderboards, ranks and dashboards. Every operation takes a single `now`
//! snapshot so window resolution and open-session clipping agree with each
//! other for the whole request; the `*_at` variants expose that instant for
//! callers and tests, the plain variants capture `Utc::now()` once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use studyroom_api_types::{
    Leaderboard, LeaderboardEntry, RangeRanks, RangeTotals, RankSummary, TimeRange, UnifiedSession, UserDashboard,
};
use studyroom_interfaces::{DatabaseError, SessionRepository, UserRepository};

use crate::daily::{cumulative_series, DailyBreakdown};
use crate::error::{ServiceError, ServiceResult};
use crate::overlap::totals_in_window;
use crate::rank::rank_of_user;
use crate::window::{TimeWindow, WindowResolver};

/// How many recent sessions a dashboard carries
const RECENT_SESSIONS_LIMIT: u64 = 30;

/// Hard cap on leaderboard size regardless of the requested `top`
const MAX_LEADERBOARD_TOP: usize = 100;

/// The attendance service: pure recomputation over the session store.
pub struct AttendanceService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    resolver: WindowResolver,
    trend_days: u32,
}

impl AttendanceService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        resolver: WindowResolver,
        trend_days: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            resolver,
            trend_days,
        }
    }

    pub fn resolver(&self) -> &WindowResolver {
        &self.resolver
    }

    /// Open a new session for a user.
    ///
    /// Rejected with a conflict while the user already has an open session;
    /// the storage-level uniqueness guard backs the pre-check up under
    /// concurrent requests.
    pub async fn check_in(&self, user_id: i32) -> ServiceResult<UnifiedSession> {
        self.check_in_at(user_id, Utc::now()).await
    }

    pub async fn check_in_at(&self, user_id: i32, now: DateTime<Utc>) -> ServiceResult<UnifiedSession> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;

        if self.sessions.find_open_for_user(user_id).await?.is_some() {
            warn!(user_id, "check-in rejected: session already open");
            return Err(ServiceError::conflict("already checked in; check out before checking in again"));
        }

        let session = self.sessions.insert_checkin(user_id, now).await.map_err(|e| match e {
            DatabaseError::Constraint { .. } => {
                warn!(user_id, "check-in raced another request; open-session guard held");
                ServiceError::conflict("already checked in; check out before checking in again")
            }
            other => ServiceError::Database(other),
        })?;

        info!(user_id, nickname = %user.nickname, "checked in");
        Ok(session)
    }

    /// Close the user's open session, recording checkout time and duration.
    pub async fn check_out(&self, user_id: i32) -> ServiceResult<UnifiedSession> {
        self.check_out_at(user_id, Utc::now()).await
    }

    pub async fn check_out_at(&self, user_id: i32, now: DateTime<Utc>) -> ServiceResult<UnifiedSession> {
        let open = self
            .sessions
            .find_open_for_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::conflict("no open session; check in first"))?;

        let session_id = open
            .id
            .as_i32()
            .ok_or_else(|| ServiceError::validation("session id is not numeric"))?;
        let duration_sec = (now - open.checkin_at).num_seconds().max(0);

        let closed = self.sessions.close_session(session_id, now, duration_sec).await?;
        info!(user_id, duration_sec, "checked out");
        Ok(closed)
    }

    /// Administrative checkout; identical closing semantics to [`check_out`].
    ///
    /// [`check_out`]: AttendanceService::check_out
    pub async fn force_check_out(&self, user_id: i32) -> ServiceResult<UnifiedSession> {
        self.force_check_out_at(user_id, Utc::now()).await
    }

    pub async fn force_check_out_at(&self, user_id: i32, now: DateTime<Utc>) -> ServiceResult<UnifiedSession> {
        warn!(user_id, "administrative force checkout");
        self.check_out_at(user_id, now).await
    }

    /// Leaderboard over a named range: totals sorted descending, truncated
    /// to `top`, plus current room occupancy.
    pub async fn leaderboard(&self, range: TimeRange, top: usize) -> ServiceResult<Leaderboard> {
        self.leaderboard_at(range, top, Utc::now()).await
    }

    pub async fn leaderboard_at(&self, range: TimeRange, top: usize, now: DateTime<Utc>) -> ServiceResult<Leaderboard> {
        let top = top.clamp(1, MAX_LEADERBOARD_TOP);
        let window = self.resolver.resolve(range, now);

        let spans = self.sessions.find_overlapping(window.start, window.end, None).await?;
        let totals = totals_in_window(&spans, &window, now);
        let total_users = (totals.len() as u64).max(1);

        let mut items: Vec<LeaderboardEntry> = totals
            .into_values()
            .map(|t| LeaderboardEntry {
                nickname: t.nickname,
                total_sec: t.total_sec,
            })
            .collect();
        items.sort_by(|a, b| b.total_sec.cmp(&a.total_sec).then_with(|| a.nickname.cmp(&b.nickname)));
        items.truncate(top);

        let occupancy = self.sessions.count_open().await?;

        Ok(Leaderboard {
            range,
            start: window.start,
            end: window.end,
            occupancy,
            items,
            total_users,
        })
    }

    /// Competition rank for one user over a named range.
    pub async fn rank_for(&self, range: TimeRange, user_id: i32) -> ServiceResult<RankSummary> {
        self.rank_for_at(range, user_id, Utc::now()).await
    }

    pub async fn rank_for_at(&self, range: TimeRange, user_id: i32, now: DateTime<Utc>) -> ServiceResult<RankSummary> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;

        let window = self.resolver.resolve(range, now);
        Ok(self.window_rank(&window, user_id, now).await?.1)
    }

    /// All-time seconds for one user: stored durations of closed sessions
    /// plus the live elapsed seconds of an open one. Produces the same
    /// number as aggregating against the `all` window.
    pub async fn all_time_total_at(&self, user_id: i32, now: DateTime<Utc>) -> ServiceResult<i64> {
        let closed = self.sessions.sum_closed_durations(user_id).await?;
        let live = match self.sessions.find_open_for_user(user_id).await? {
            Some(open) => (now - open.checkin_at).num_seconds(),
            None => 0,
        };
        Ok((closed + live).max(0))
    }

    /// Full dashboard for one user: per-range totals and ranks, daily trend
    /// with per-day ranks, cumulative series and recent sessions.
    pub async fn dashboard(&self, user_id: i32) -> ServiceResult<UserDashboard> {
        self.dashboard_at(user_id, Utc::now()).await
    }

    pub async fn dashboard_at(&self, user_id: i32, now: DateTime<Utc>) -> ServiceResult<UserDashboard> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;

        let sessions = self.sessions.recent_for_user(user_id, RECENT_SESSIONS_LIMIT).await?;

        let today = self.resolver.resolve(TimeRange::Today, now);
        let week = self.resolver.resolve(TimeRange::Week, now);
        let month = self.resolver.resolve(TimeRange::Month, now);
        let all = self.resolver.resolve(TimeRange::All, now);

        let (today_sec, today_rank) = self.window_rank(&today, user_id, now).await?;
        let (week_sec, week_rank) = self.window_rank(&week, user_id, now).await?;
        let (month_sec, month_rank) = self.window_rank(&month, user_id, now).await?;
        let (_, all_rank) = self.window_rank(&all, user_id, now).await?;
        let all_sec = self.all_time_total_at(user_id, now).await?;

        // Trend window: the last `trend_days` whole local days, up to and
        // including today (which is still filling in).
        let trend_end = self.resolver.local_midnight(self.resolver.local_date(now) + Duration::days(1));
        let trend_start = trend_end - Duration::days(i64::from(self.trend_days));
        let trend = TimeWindow::new(trend_start, trend_end);

        let spans = self.sessions.find_overlapping(trend.start, trend.end, None).await?;
        let breakdown = DailyBreakdown::build(&spans, &trend, &self.resolver, now);
        let daily = breakdown.rank_series_for(user_id);
        let daily_cum = cumulative_series(&daily);

        Ok(UserDashboard {
            user,
            totals: RangeTotals {
                today: today_sec,
                week: week_sec,
                month: month_sec,
                all: all_sec,
            },
            ranks: RangeRanks {
                today: today_rank,
                week: week_rank,
                month: month_rank,
                all: all_rank,
            },
            daily,
            daily_cum,
            sessions,
        })
    }

    /// Number of currently open sessions
    pub async fn occupancy(&self) -> ServiceResult<u64> {
        Ok(self.sessions.count_open().await?)
    }

    async fn window_rank(
        &self,
        window: &TimeWindow,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> ServiceResult<(i64, RankSummary)> {
        let spans = self.sessions.find_overlapping(window.start, window.end, None).await?;
        let totals = totals_in_window(&spans, window, now);
        let rank = rank_of_user(&totals, user_id);
        Ok((rank.my_sec, rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use mockall::mock;
    use mockall::predicate::eq;
    use studyroom_api_types::{ApiId, SessionSpan, UnifiedUser};
    use studyroom_interfaces::Repository;

    mock! {
        pub Users {}

        #[async_trait::async_trait]
        impl Repository for Users {
            async fn health_check(&self) -> Result<(), DatabaseError>;
        }

        #[async_trait::async_trait]
        impl UserRepository for Users {
            async fn create_user(
                &self,
                student_no: &str,
                name: &str,
                nickname: &str,
                pin_hash: &str,
            ) -> Result<UnifiedUser, DatabaseError>;
            async fn find_by_id(&self, id: i32) -> Result<Option<UnifiedUser>, DatabaseError>;
            async fn find_by_student_no(&self, student_no: &str) -> Result<Option<UnifiedUser>, DatabaseError>;
            async fn pin_hash_by_student_no(&self, student_no: &str) -> Result<Option<String>, DatabaseError>;
            async fn list_users(&self, limit: u64) -> Result<Vec<UnifiedUser>, DatabaseError>;
            async fn update_pin_hash(&self, student_no: &str, pin_hash: &str) -> Result<(), DatabaseError>;
            async fn count(&self) -> Result<u64, DatabaseError>;
        }
    }

    mock! {
        pub Sessions {}

        #[async_trait::async_trait]
        impl Repository for Sessions {
            async fn health_check(&self) -> Result<(), DatabaseError>;
        }

        #[async_trait::async_trait]
        impl SessionRepository for Sessions {
            async fn insert_checkin(
                &self,
                user_id: i32,
                checkin_at: DateTime<Utc>,
            ) -> Result<UnifiedSession, DatabaseError>;
            async fn find_open_for_user(&self, user_id: i32) -> Result<Option<UnifiedSession>, DatabaseError>;
            async fn close_session(
                &self,
                session_id: i32,
                checkout_at: DateTime<Utc>,
                duration_sec: i64,
            ) -> Result<UnifiedSession, DatabaseError>;
            async fn find_overlapping(
                &self,
                start: DateTime<Utc>,
                end: DateTime<Utc>,
                user_id: Option<i32>,
            ) -> Result<Vec<SessionSpan>, DatabaseError>;
            async fn sum_closed_durations(&self, user_id: i32) -> Result<i64, DatabaseError>;
            async fn recent_for_user(&self, user_id: i32, limit: u64) -> Result<Vec<UnifiedSession>, DatabaseError>;
            async fn count_open(&self) -> Result<u64, DatabaseError>;
        }
    }

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        jst()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn user(id: i32) -> UnifiedUser {
        UnifiedUser {
            id: ApiId::from_i32(id),
            student_no: format!("s{:04}", id),
            name: format!("User {}", id),
            nickname: format!("u{}", id),
            created_at: at(2024, 1, 1, 0, 0),
        }
    }

    fn open_session(id: i32, user_id: i32, checkin: DateTime<Utc>) -> UnifiedSession {
        UnifiedSession {
            id: ApiId::from_i32(id),
            user_id: ApiId::from_i32(user_id),
            checkin_at: checkin,
            checkout_at: None,
            duration_sec: None,
            is_active: true,
        }
    }

    fn service(users: MockUsers, sessions: MockSessions) -> AttendanceService {
        AttendanceService::new(
            Arc::new(users),
            Arc::new(sessions),
            WindowResolver::new(jst()),
            21,
        )
    }

    #[tokio::test]
    async fn test_check_in_rejected_while_open() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().with(eq(1)).returning(|id| Ok(Some(user(id))));

        let mut sessions = MockSessions::new();
        sessions
            .expect_find_open_for_user()
            .with(eq(1))
            .returning(|_| Ok(Some(open_session(9, 1, at(2024, 6, 5, 9, 0)))));

        let svc = service(users, sessions);
        let err = svc.check_in_at(1, at(2024, 6, 5, 10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_check_in_maps_constraint_race_to_conflict() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));

        let mut sessions = MockSessions::new();
        sessions.expect_find_open_for_user().returning(|_| Ok(None));
        sessions.expect_insert_checkin().returning(|_, _| {
            Err(DatabaseError::Constraint {
                message: "open session exists".to_string(),
            })
        });

        let svc = service(users, sessions);
        let err = svc.check_in_at(1, at(2024, 6, 5, 10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_check_in_unknown_user() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(users, MockSessions::new());
        let err = svc.check_in_at(7, at(2024, 6, 5, 10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_check_out_computes_whole_second_duration() {
        let checkin = at(2024, 6, 5, 9, 0);
        let now = at(2024, 6, 5, 10, 30);

        let mut sessions = MockSessions::new();
        sessions
            .expect_find_open_for_user()
            .with(eq(1))
            .returning(move |_| Ok(Some(open_session(9, 1, checkin))));
        sessions
            .expect_close_session()
            .with(eq(9), eq(now), eq(5400i64))
            .returning(move |id, checkout, dur| {
                Ok(UnifiedSession {
                    id: ApiId::from_i32(id),
                    user_id: ApiId::from_i32(1),
                    checkin_at: checkin,
                    checkout_at: Some(checkout),
                    duration_sec: Some(dur),
                    is_active: false,
                })
            });

        let svc = service(MockUsers::new(), sessions);
        let closed = svc.check_out_at(1, now).await.unwrap();
        assert_eq!(closed.duration_sec, Some(5400));
        assert!(!closed.is_active);
    }

    #[tokio::test]
    async fn test_check_out_without_open_session_conflicts() {
        let mut sessions = MockSessions::new();
        sessions.expect_find_open_for_user().returning(|_| Ok(None));

        let svc = service(MockUsers::new(), sessions);
        let err = svc.check_out_at(1, at(2024, 6, 5, 10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_leaderboard_sorts_and_truncates() {
        let now = at(2024, 6, 5, 18, 0);
        let mut sessions = MockSessions::new();
        sessions.expect_find_overlapping().returning(move |_, _, _| {
            Ok(vec![
                SessionSpan {
                    user_id: 1,
                    nickname: "alpha".to_string(),
                    checkin_at: at(2024, 6, 5, 9, 0),
                    checkout_at: Some(at(2024, 6, 5, 10, 0)),
                },
                SessionSpan {
                    user_id: 2,
                    nickname: "beta".to_string(),
                    checkin_at: at(2024, 6, 5, 9, 0),
                    checkout_at: Some(at(2024, 6, 5, 12, 0)),
                },
                SessionSpan {
                    user_id: 3,
                    nickname: "gamma".to_string(),
                    checkin_at: at(2024, 6, 5, 9, 0),
                    checkout_at: Some(at(2024, 6, 5, 9, 30)),
                },
            ])
        });
        sessions.expect_count_open().returning(|| Ok(2));

        let svc = service(MockUsers::new(), sessions);
        let board = svc.leaderboard_at(TimeRange::Today, 2, now).await.unwrap();
        assert_eq!(board.items.len(), 2);
        assert_eq!(board.items[0].nickname, "beta");
        assert_eq!(board.items[1].nickname, "alpha");
        assert_eq!(board.total_users, 3);
        assert_eq!(board.occupancy, 2);
    }

    #[tokio::test]
    async fn test_all_time_total_includes_live_session() {
        let now = at(2024, 6, 5, 10, 30);
        let mut sessions = MockSessions::new();
        sessions.expect_sum_closed_durations().with(eq(1)).returning(|_| Ok(1000));
        sessions
            .expect_find_open_for_user()
            .with(eq(1))
            .returning(move |_| Ok(Some(open_session(9, 1, at(2024, 6, 5, 10, 0)))));

        let svc = service(MockUsers::new(), sessions);
        assert_eq!(svc.all_time_total_at(1, now).await.unwrap(), 1000 + 1800);
    }

    #[tokio::test]
    async fn test_dashboard_unknown_user_not_found() {
        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(users, MockSessions::new());
        let err = svc.dashboard_at(42, at(2024, 6, 5, 10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_dashboard_idle_user_competes_from_zero() {
        let now = at(2024, 6, 5, 18, 0);

        let mut users = MockUsers::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));

        let mut sessions = MockSessions::new();
        sessions.expect_recent_for_user().returning(|_, _| Ok(vec![]));
        sessions.expect_sum_closed_durations().returning(|_| Ok(0));
        sessions.expect_find_open_for_user().returning(|_| Ok(None));
        // one other user present today, in every queried window
        sessions.expect_find_overlapping().returning(move |_, _, _| {
            Ok(vec![SessionSpan {
                user_id: 2,
                nickname: "beta".to_string(),
                checkin_at: at(2024, 6, 5, 9, 0),
                checkout_at: Some(at(2024, 6, 5, 12, 0)),
            }])
        });

        let svc = service(users, sessions);
        let dash = svc.dashboard_at(1, now).await.unwrap();
        assert_eq!(dash.totals.today, 0);
        assert_eq!(dash.totals.all, 0);
        // the one present user strictly exceeds zero; the target is not in the map
        assert_eq!(dash.ranks.today.rank, 2);
        assert_eq!(dash.ranks.today.total_users, 1);
        assert_eq!(dash.daily.len(), 21);
        assert!(dash.daily_cum.iter().all(|p| p.cum_sec == 0));
    }
}
