//! Time window resolution
//!
//! Maps a named range (today/week/month/all) to a concrete half-open
//! `[start, end)` interval. Boundaries are midnights in the configured
//! fixed-offset zone; the interval itself is carried as UTC instants so the
//! rest of the engine never re-applies the offset.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use studyroom_api_types::TimeRange;

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window length in whole seconds
    pub fn duration_sec(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Resolves named ranges against an evaluation instant.
///
/// The zone is fixed per deployment (UTC+9 in the reference setup) and is
/// the single place day/week/month boundaries are computed.
#[derive(Debug, Clone, Copy)]
pub struct WindowResolver {
    tz: FixedOffset,
}

impl WindowResolver {
    pub fn new(tz: FixedOffset) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> FixedOffset {
        self.tz
    }

    /// The local calendar date of an instant
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.tz).date_naive()
    }

    /// Local midnight of a calendar day, as a UTC instant.
    ///
    /// A fixed offset maps local times one-to-one onto UTC, so this never
    /// hits a gap or ambiguity.
    pub fn local_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        let local = day.and_time(NaiveTime::MIN);
        let utc_naive = local - Duration::seconds(i64::from(self.tz.local_minus_utc()));
        Utc.from_utc_datetime(&utc_naive)
    }

    /// Resolve a named range to `[start, end)` anchored at `now`
    pub fn resolve(&self, range: TimeRange, now: DateTime<Utc>) -> TimeWindow {
        match range {
            TimeRange::Today => {
                let day = self.local_date(now);
                TimeWindow::new(self.local_midnight(day), self.local_midnight(day + Duration::days(1)))
            }
            TimeRange::Week => {
                let day = self.local_date(now);
                let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
                TimeWindow::new(self.local_midnight(monday), self.local_midnight(monday + Duration::days(7)))
            }
            TimeRange::Month => {
                let day = self.local_date(now);
                let first = first_of_month(day.year(), day.month());
                let next = if day.month() == 12 {
                    first_of_month(day.year() + 1, 1)
                } else {
                    first_of_month(day.year(), day.month() + 1)
                };
                TimeWindow::new(self.local_midnight(first), self.local_midnight(next))
            }
            TimeRange::All => {
                // Practically infinite: wide enough for every realistic
                // session, still a plain window the aggregator can scan.
                TimeWindow::new(
                    self.local_midnight(first_of_month(2000, 1)),
                    self.local_midnight(first_of_month(2100, 1)),
                )
            }
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // month is always 1..=12 here
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid first-of-month date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyroom_api_types::TimeRange;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn resolver() -> WindowResolver {
        WindowResolver::new(jst())
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        jst()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_today_is_local_midnight_to_midnight() {
        let now = at(2024, 6, 5, 14, 30);
        let w = resolver().resolve(TimeRange::Today, now);
        assert_eq!(w.start, at(2024, 6, 5, 0, 0));
        assert_eq!(w.end, at(2024, 6, 6, 0, 0));
        assert_eq!(w.duration_sec(), 86_400);
    }

    #[test]
    fn test_today_respects_offset_not_utc_date() {
        // 2024-06-05 23:30 UTC is already 2024-06-06 08:30 in UTC+9
        let now = Utc.with_ymd_and_hms(2024, 6, 5, 23, 30, 0).unwrap();
        let w = resolver().resolve(TimeRange::Today, now);
        assert_eq!(w.start, at(2024, 6, 6, 0, 0));
    }

    #[test]
    fn test_week_starts_monday() {
        // 2024-06-05 is a Wednesday; the ISO week starts Monday 06-03
        let now = at(2024, 6, 5, 10, 0);
        let w = resolver().resolve(TimeRange::Week, now);
        assert_eq!(w.start, at(2024, 6, 3, 0, 0));
        assert_eq!(w.end, at(2024, 6, 10, 0, 0));
    }

    #[test]
    fn test_week_on_monday_starts_same_day() {
        let now = at(2024, 6, 3, 0, 0);
        let w = resolver().resolve(TimeRange::Week, now);
        assert_eq!(w.start, at(2024, 6, 3, 0, 0));
    }

    #[test]
    fn test_month_boundaries() {
        let now = at(2024, 6, 15, 12, 0);
        let w = resolver().resolve(TimeRange::Month, now);
        assert_eq!(w.start, at(2024, 6, 1, 0, 0));
        assert_eq!(w.end, at(2024, 7, 1, 0, 0));
    }

    #[test]
    fn test_month_december_rollover() {
        let now = at(2024, 12, 31, 23, 59);
        let w = resolver().resolve(TimeRange::Month, now);
        assert_eq!(w.start, at(2024, 12, 1, 0, 0));
        assert_eq!(w.end, at(2025, 1, 1, 0, 0));
    }

    #[test]
    fn test_all_is_wide_finite_interval() {
        let now = at(2024, 6, 5, 10, 0);
        let w = resolver().resolve(TimeRange::All, now);
        assert_eq!(w.start, at(2000, 1, 1, 0, 0));
        assert_eq!(w.end, at(2100, 1, 1, 0, 0));
    }

    #[test]
    fn test_resolution_is_pure() {
        let now = at(2024, 2, 29, 8, 0);
        let a = resolver().resolve(TimeRange::Month, now);
        let b = resolver().resolve(TimeRange::Month, now);
        assert_eq!(a, b);
    }
}
