//! Consecutive-day streak calculation.
//!
//! A streak is a run of calendar days each containing at least one session.
//! Multiple sessions on one day occupy that day once. The current streak is
//! only active while the most recent occupied day is today or yesterday;
//! the best streak is the longest run anywhere in history.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::session::Session;

/// Derived streak statistics, in whole days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakData {
    pub current: u32,
    pub best: u32,
}

/// Compute streaks over the full session set.
///
/// `today` is the caller's local date; sessions are projected onto their
/// local start dates.
pub fn streak_data(sessions: &[Session], today: NaiveDate) -> StreakData {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.start_time.date()).collect();
    if days.is_empty() {
        return StreakData::default();
    }

    let latest = *days.iter().next_back().unwrap_or(&today);

    // Current streak: walk backwards from the most recent occupied day,
    // but only when the streak is still alive (today or yesterday).
    let mut current = 0u32;
    let yesterday = today.pred_opt();
    if latest == today || Some(latest) == yesterday {
        let mut check = Some(latest);
        while let Some(day) = check {
            if !days.contains(&day) {
                break;
            }
            current += 1;
            check = day.pred_opt();
        }
    }

    // Best streak: forward scan, extending a run on exact next-day adjacency.
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    // Current can never exceed best by construction; keep the floor anyway.
    StreakData {
        current,
        best: best.max(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn session_on(date: NaiveDate, hour: u32) -> Session {
        Session {
            id: 0,
            start_time: date.and_hms_opt(hour, 0, 0).unwrap(),
            duration: 600,
            planned_duration: 600,
            note: String::new(),
        }
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    }

    #[test]
    fn empty_set_has_no_streaks() {
        assert_eq!(streak_data(&[], day(0)), StreakData::default());
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let sessions = [session_on(day(0), 7), session_on(day(1), 7), session_on(day(2), 7)];
        let data = streak_data(&sessions, day(2));
        assert_eq!(data.current, 3);
        assert_eq!(data.best, 3);
    }

    #[test]
    fn gap_resets_the_current_streak() {
        let sessions = [session_on(day(0), 7), session_on(day(2), 7)];
        let data = streak_data(&sessions, day(2));
        assert_eq!(data.current, 1);
        assert_eq!(data.best, 1);
    }

    #[test]
    fn streak_alive_through_yesterday() {
        let sessions = [session_on(day(0), 7), session_on(day(1), 7)];
        let data = streak_data(&sessions, day(2));
        assert_eq!(data.current, 2);
        assert_eq!(data.best, 2);
    }

    #[test]
    fn streak_dead_after_two_idle_days() {
        let sessions = [session_on(day(0), 7), session_on(day(1), 7)];
        let data = streak_data(&sessions, day(3));
        assert_eq!(data.current, 0);
        assert_eq!(data.best, 2);
    }

    #[test]
    fn multiple_sessions_a_day_occupy_it_once() {
        let sessions = [
            session_on(day(0), 7),
            session_on(day(0), 12),
            session_on(day(0), 21),
            session_on(day(1), 7),
        ];
        let data = streak_data(&sessions, day(1));
        assert_eq!(data.current, 2);
        assert_eq!(data.best, 2);
    }

    #[test]
    fn best_streak_found_in_older_history() {
        let sessions = [
            session_on(day(0), 7),
            session_on(day(1), 7),
            session_on(day(2), 7),
            session_on(day(3), 7),
            // Gap, then a shorter active run.
            session_on(day(6), 7),
            session_on(day(7), 7),
        ];
        let data = streak_data(&sessions, day(7));
        assert_eq!(data.current, 2);
        assert_eq!(data.best, 4);
    }

    #[test]
    fn single_session_today() {
        let data = streak_data(&[session_on(day(0), 7)], day(0));
        assert_eq!(data, StreakData { current: 1, best: 1 });
    }

    #[test]
    fn sessions_only_in_the_future_of_the_gap_dont_revive() {
        // Most recent day is well before yesterday: no active streak.
        let sessions = [session_on(day(0), 7), session_on(day(1), 7)];
        let data = streak_data(&sessions, day(30));
        assert_eq!(data.current, 0);
        assert_eq!(data.best, 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn current_never_exceeds_best(offsets in proptest::collection::btree_set(0u64..60, 0..30), today_offset in 0u64..70) {
                let sessions: Vec<Session> =
                    offsets.iter().map(|&o| session_on(day(o), 7)).collect();
                let data = streak_data(&sessions, day(today_offset));
                prop_assert!(data.current <= data.best);
            }

            #[test]
            fn best_matches_longest_run_by_naive_count(offsets in proptest::collection::btree_set(0u64..60, 1..30)) {
                let sessions: Vec<Session> =
                    offsets.iter().map(|&o| session_on(day(o), 7)).collect();
                let data = streak_data(&sessions, day(61));

                // Longest run of consecutive offsets, counted the slow way.
                let mut longest = 0u32;
                for &start in &offsets {
                    let mut len = 0u32;
                    while offsets.contains(&(start + len as u64)) {
                        len += 1;
                    }
                    longest = longest.max(len);
                }
                prop_assert_eq!(data.best, longest);
            }
        }
    }
}
