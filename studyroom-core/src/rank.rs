//! Competition ranking
//!
//! rank = 1 + count(users with strictly greater totals); ties share the
//! same rank and the next distinct total skips past the tied group.

use std::collections::HashMap;

use studyroom_api_types::RankSummary;

use crate::overlap::UserTotal;

/// Rank a user within a per-user totals map.
///
/// A user absent from the map competes with zero seconds. `total_users`
/// never drops below 1 so an empty room still reads "1 of 1".
pub fn rank_of_user(totals: &HashMap<i32, UserTotal>, user_id: i32) -> RankSummary {
    let my_sec = totals.get(&user_id).map(|t| t.total_sec).unwrap_or(0);
    let greater = totals.values().filter(|t| t.total_sec > my_sec).count() as u64;
    RankSummary {
        rank: greater + 1,
        total_users: (totals.len() as u64).max(1),
        my_sec,
    }
}

/// Same ranking rule over plain per-user seconds, as used for day bins
pub fn rank_among(day_totals: &HashMap<i32, i64>, user_id: i32) -> RankSummary {
    let my_sec = day_totals.get(&user_id).copied().unwrap_or(0);
    let greater = day_totals.values().filter(|&&sec| sec > my_sec).count() as u64;
    RankSummary {
        rank: greater + 1,
        total_users: (day_totals.len() as u64).max(1),
        my_sec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(i32, i64)]) -> HashMap<i32, UserTotal> {
        entries
            .iter()
            .map(|&(id, sec)| {
                (
                    id,
                    UserTotal {
                        nickname: format!("u{}", id),
                        total_sec: sec,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_ties_share_rank_and_skip() {
        // totals 100, 100, 50: the tied pair both rank 1, the next ranks 3
        let t = totals(&[(1, 100), (2, 100), (3, 50)]);
        assert_eq!(rank_of_user(&t, 1).rank, 1);
        assert_eq!(rank_of_user(&t, 2).rank, 1);
        assert_eq!(rank_of_user(&t, 3).rank, 3);
        assert_eq!(rank_of_user(&t, 3).total_users, 3);
    }

    #[test]
    fn test_maximum_total_ranks_first() {
        let t = totals(&[(1, 10), (2, 250), (3, 40)]);
        let top = rank_of_user(&t, 2);
        assert_eq!(top.rank, 1);
        assert_eq!(top.my_sec, 250);
    }

    #[test]
    fn test_rank_bounded_by_total_users() {
        let t = totals(&[(1, 10), (2, 250), (3, 40)]);
        for id in [1, 2, 3] {
            assert!(rank_of_user(&t, id).rank <= rank_of_user(&t, id).total_users);
        }
    }

    #[test]
    fn test_absent_user_competes_from_zero() {
        let t = totals(&[(1, 10), (2, 250)]);
        let r = rank_of_user(&t, 99);
        assert_eq!(r.my_sec, 0);
        // both present users strictly exceed zero
        assert_eq!(r.rank, 3);
        assert_eq!(r.total_users, 2);
    }

    #[test]
    fn test_empty_map_reads_one_of_one() {
        let t = totals(&[]);
        let r = rank_of_user(&t, 1);
        assert_eq!(r.rank, 1);
        assert_eq!(r.total_users, 1);
        assert_eq!(r.my_sec, 0);
    }

    #[test]
    fn test_rank_among_matches_map_rule() {
        let mut day = HashMap::new();
        day.insert(1, 100i64);
        day.insert(2, 100i64);
        day.insert(3, 50i64);
        assert_eq!(rank_among(&day, 3).rank, 3);
        assert_eq!(rank_among(&day, 1).rank, 1);
    }
}
