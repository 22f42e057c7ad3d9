//! Daily series building
//!
//! Breaks a window into local-midnight day bins and distributes each
//! session's overlap across them, then derives per-day rank and cumulative
//! series for a single user. A session spanning midnight contributes to
//! every bin it touches.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use studyroom_api_types::{CumulativePoint, DailyPoint, SessionSpan};

use crate::overlap::clamp_overlap_sec;
use crate::rank::rank_among;
use crate::window::{TimeWindow, WindowResolver};

/// Per-day seconds for every user active in a window.
///
/// Bins are whole local days; the first bin starts at the local midnight of
/// the window start. Callers are expected to pass midnight-aligned windows;
/// the end is not re-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBreakdown {
    labels: Vec<NaiveDate>,
    seconds_by_user: HashMap<i32, Vec<i64>>,
    nicknames: HashMap<i32, String>,
}

impl DailyBreakdown {
    /// Build the breakdown for all users from overlap-query spans.
    pub fn build(
        spans: &[SessionSpan],
        window: &TimeWindow,
        resolver: &WindowResolver,
        now: DateTime<Utc>,
    ) -> Self {
        let mut labels = Vec::new();
        let mut day_starts = Vec::new();
        let mut day = resolver.local_date(window.start);
        loop {
            let start = resolver.local_midnight(day);
            if start >= window.end {
                break;
            }
            labels.push(day);
            day_starts.push(start);
            day = day + Duration::days(1);
        }

        let mut seconds_by_user: HashMap<i32, Vec<i64>> = HashMap::new();
        let mut nicknames: HashMap<i32, String> = HashMap::new();

        for span in spans {
            let checkin = span.checkin_at;
            let checkout = span.end_or(now);

            for (i, &day_start) in day_starts.iter().enumerate() {
                let day_end = day_start + Duration::days(1);
                if day_end <= checkin || day_start >= checkout {
                    continue;
                }
                let sec = clamp_overlap_sec(checkin, checkout, day_start, day_end);
                if sec == 0 {
                    continue;
                }
                seconds_by_user
                    .entry(span.user_id)
                    .or_insert_with(|| vec![0; labels.len()])[i] += sec;
                nicknames
                    .entry(span.user_id)
                    .or_insert_with(|| span.nickname.clone());
            }
        }

        Self {
            labels,
            seconds_by_user,
            nicknames,
        }
    }

    pub fn labels(&self) -> &[NaiveDate] {
        &self.labels
    }

    pub fn nickname(&self, user_id: i32) -> Option<&str> {
        self.nicknames.get(&user_id).map(String::as_str)
    }

    /// A user's per-day seconds; all zeros when the user had no overlap
    pub fn seconds_for(&self, user_id: i32) -> Vec<i64> {
        self.seconds_by_user
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| vec![0; self.labels.len()])
    }

    /// Whole-window total for a user, summed over the day bins
    pub fn total_for(&self, user_id: i32) -> i64 {
        self.seconds_for(user_id).iter().sum()
    }

    /// Per-day rank series for one user.
    ///
    /// Each day is ranked against that day's totals only, so ranks move day
    /// to day. The target user is ranked even with zero presence: they
    /// compete from zero rather than being excluded.
    pub fn rank_series_for(&self, user_id: i32) -> Vec<DailyPoint> {
        let target_secs = self.seconds_for(user_id);

        self.labels
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                let mut day_totals: HashMap<i32, i64> = self
                    .seconds_by_user
                    .iter()
                    .map(|(&uid, secs)| (uid, secs[i]))
                    .collect();
                day_totals.entry(user_id).or_insert(target_secs[i]);

                let rank = rank_among(&day_totals, user_id);
                DailyPoint {
                    date,
                    sec: target_secs[i],
                    rank: rank.rank,
                    total_users: rank.total_users,
                }
            })
            .collect()
    }
}

/// Running sum of a daily series, for presentation
pub fn cumulative_series(points: &[DailyPoint]) -> Vec<CumulativePoint> {
    let mut cum = 0;
    points
        .iter()
        .map(|p| {
            cum += p.sec;
            CumulativePoint {
                date: p.date,
                cum_sec: cum,
            }
        })
        .collect()
}
