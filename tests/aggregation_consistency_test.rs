//! Aggregation consistency tests
//!
//! Cross-checks the engine's different computation paths against real
//! storage with a pinned evaluation instant: the direct all-time total must
//! agree with the `all` window aggregate, and daily series sums must agree
//! with whole-window totals.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use studyroom_api_types::TimeRange;
use studyroom_core::{AttendanceService, WindowResolver};
use studyroom_interfaces::{SessionRepository, UserRepository};
use studyroom_storage::{SeaOrmSessionRepository, SeaOrmUserRepository};

struct Fixture {
    users: Arc<SeaOrmUserRepository>,
    sessions: Arc<SeaOrmSessionRepository>,
    service: AttendanceService,
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

async fn fixture(trend_days: u32) -> Fixture {
    let db = studyroom_storage::testing::database::create_test_database().await;
    let users = Arc::new(SeaOrmUserRepository::new(db.clone()));
    let sessions = Arc::new(SeaOrmSessionRepository::new(db));
    let service = AttendanceService::new(
        users.clone(),
        sessions.clone(),
        WindowResolver::new(jst()),
        trend_days,
    );
    Fixture {
        users,
        sessions,
        service,
    }
}

impl Fixture {
    async fn add_user(&self, student_no: &str, nickname: &str) -> i32 {
        self.users
            .create_user(student_no, "Name", nickname, "hash")
            .await
            .unwrap()
            .id
            .as_i32()
            .unwrap()
    }

    async fn add_closed_session(&self, user_id: i32, checkin: DateTime<Utc>, checkout: DateTime<Utc>) {
        let open = self.sessions.insert_checkin(user_id, checkin).await.unwrap();
        let duration = (checkout - checkin).num_seconds().max(0);
        self.sessions
            .close_session(open.id.as_i32().unwrap(), checkout, duration)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_leaderboard_and_rank_agree() {
    let f = fixture(3).await;
    let now = at(2024, 6, 5, 18, 0);

    let a = f.add_user("s1", "alpha").await;
    let b = f.add_user("s2", "beta").await;

    // alpha: 5400 + 600 today; beta: open since 17:00 = 3600 so far
    f.add_closed_session(a, at(2024, 6, 5, 9, 0), at(2024, 6, 5, 10, 30)).await;
    f.add_closed_session(a, at(2024, 6, 5, 14, 0), at(2024, 6, 5, 14, 10)).await;
    f.sessions.insert_checkin(b, at(2024, 6, 5, 17, 0)).await.unwrap();

    let board = f.service.leaderboard_at(TimeRange::Today, 20, now).await.unwrap();
    assert_eq!(board.items.len(), 2);
    assert_eq!(board.items[0].nickname, "alpha");
    assert_eq!(board.items[0].total_sec, 6000);
    assert_eq!(board.items[1].total_sec, 3600);
    assert_eq!(board.occupancy, 1);

    let rank_a = f.service.rank_for_at(TimeRange::Today, a, now).await.unwrap();
    let rank_b = f.service.rank_for_at(TimeRange::Today, b, now).await.unwrap();
    assert_eq!((rank_a.rank, rank_a.my_sec), (1, 6000));
    assert_eq!((rank_b.rank, rank_b.my_sec), (2, 3600));
    assert_eq!(rank_a.total_users, 2);
}

#[tokio::test]
async fn test_all_time_direct_total_matches_all_window_aggregate() {
    let f = fixture(3).await;
    let now = at(2024, 6, 5, 18, 0);

    let a = f.add_user("s1", "alpha").await;
    f.add_closed_session(a, at(2024, 5, 20, 9, 0), at(2024, 5, 20, 11, 0)).await;
    f.add_closed_session(a, at(2024, 6, 5, 9, 0), at(2024, 6, 5, 10, 0)).await;
    // live session contributes elapsed seconds
    f.sessions.insert_checkin(a, at(2024, 6, 5, 17, 30)).await.unwrap();

    let direct = f.service.all_time_total_at(a, now).await.unwrap();
    let via_window = f.service.rank_for_at(TimeRange::All, a, now).await.unwrap().my_sec;
    assert_eq!(direct, 7200 + 3600 + 1800);
    assert_eq!(direct, via_window);

    // dashboard carries the direct form in its totals
    let dash = f.service.dashboard_at(a, now).await.unwrap();
    assert_eq!(dash.totals.all, direct);
    assert_eq!(dash.ranks.all.my_sec, via_window);
}

#[tokio::test]
async fn test_daily_series_sums_match_window_totals() {
    let f = fixture(3).await;
    let now = at(2024, 6, 5, 18, 0);

    let a = f.add_user("s1", "alpha").await;
    // session straddling midnight inside the 3-day trend window
    f.add_closed_session(a, at(2024, 6, 3, 23, 0), at(2024, 6, 4, 2, 0)).await;
    f.add_closed_session(a, at(2024, 6, 5, 9, 0), at(2024, 6, 5, 10, 0)).await;

    let dash = f.service.dashboard_at(a, now).await.unwrap();
    assert_eq!(dash.daily.len(), 3);

    let daily_sum: i64 = dash.daily.iter().map(|p| p.sec).sum();
    assert_eq!(daily_sum, dash.totals.all);

    // the cumulative series ends at the same sum
    assert_eq!(dash.daily_cum.last().unwrap().cum_sec, daily_sum);

    // the midnight straddle splits across the two bins
    assert_eq!(dash.daily[0].sec, 3600);
    assert_eq!(dash.daily[1].sec, 7200);
    assert_eq!(dash.daily[2].sec, 3600);
}

#[tokio::test]
async fn test_tied_totals_share_rank() {
    let f = fixture(3).await;
    let now = at(2024, 6, 5, 18, 0);

    let a = f.add_user("s1", "alpha").await;
    let b = f.add_user("s2", "beta").await;
    let c = f.add_user("s3", "gamma").await;

    // alpha and beta tie at 120 seconds, gamma has 60
    f.add_closed_session(a, at(2024, 6, 5, 9, 0), at(2024, 6, 5, 9, 2)).await;
    f.add_closed_session(b, at(2024, 6, 5, 10, 0), at(2024, 6, 5, 10, 2)).await;
    f.add_closed_session(c, at(2024, 6, 5, 11, 0), at(2024, 6, 5, 11, 1)).await;

    let rank_a = f.service.rank_for_at(TimeRange::Today, a, now).await.unwrap();
    let rank_b = f.service.rank_for_at(TimeRange::Today, b, now).await.unwrap();
    let rank_c = f.service.rank_for_at(TimeRange::Today, c, now).await.unwrap();

    // the tied pair share first place and the next distinct total skips to 3
    assert_eq!(rank_a.rank, 1);
    assert_eq!(rank_b.rank, 1);
    assert_eq!(rank_c.rank, 3);
    assert_eq!(rank_c.total_users, 3);
}

#[tokio::test]
async fn test_recomputation_is_idempotent() {
    let f = fixture(3).await;
    let now = at(2024, 6, 5, 18, 0);

    let a = f.add_user("s1", "alpha").await;
    f.add_closed_session(a, at(2024, 6, 5, 9, 0), at(2024, 6, 5, 10, 0)).await;
    f.sessions.insert_checkin(a, at(2024, 6, 5, 17, 0)).await.unwrap();

    let first = f.service.leaderboard_at(TimeRange::Week, 20, now).await.unwrap();
    let second = f.service.leaderboard_at(TimeRange::Week, 20, now).await.unwrap();
    assert_eq!(first, second);
}
