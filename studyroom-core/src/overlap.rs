//! Overlap aggregation
//!
//! Computes per-user seconds of presence within a window from raw session
//! spans. An open span is clipped to the evaluation instant, never to the
//! window end: seconds that have not happened yet are not counted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use studyroom_api_types::SessionSpan;

use crate::window::TimeWindow;

/// Per-user aggregate within one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTotal {
    pub nickname: String,
    pub total_sec: i64,
}

/// Whole seconds of overlap between `[a0, a1)` and `[b0, b1)`, zero when
/// the intervals do not intersect.
pub fn clamp_overlap_sec(
    a0: DateTime<Utc>,
    a1: DateTime<Utc>,
    b0: DateTime<Utc>,
    b1: DateTime<Utc>,
) -> i64 {
    let start = a0.max(b0);
    let end = a1.min(b1);
    if end <= start {
        return 0;
    }
    (end - start).num_seconds()
}

/// Seconds of one span inside a window, with open spans clipped to `now`
pub fn span_overlap_sec(span: &SessionSpan, window: &TimeWindow, now: DateTime<Utc>) -> i64 {
    clamp_overlap_sec(span.checkin_at, span.end_or(now), window.start, window.end)
}

/// Aggregate per-user totals for all spans against one window.
///
/// Spans are expected to come from the store's overlap query; users whose
/// spans contribute zero seconds are left out of the map entirely, so the
/// result never carries zero entries.
pub fn totals_in_window(
    spans: &[SessionSpan],
    window: &TimeWindow,
    now: DateTime<Utc>,
) -> HashMap<i32, UserTotal> {
    let mut totals: HashMap<i32, UserTotal> = HashMap::new();
    for span in spans {
        let sec = span_overlap_sec(span, window, now);
        if sec == 0 {
            continue;
        }
        totals
            .entry(span.user_id)
            .or_insert_with(|| UserTotal {
                nickname: span.nickname.clone(),
                total_sec: 0,
            })
            .total_sec += sec;
    }
    totals
}
