//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically, passing the current epoch time. Remaining time is always
//! recomputed from the start timestamp, so missed ticks are silently
//! fast-forwarded rather than replayed.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused) -> Idle
//! ```
//!
//! The whole engine serializes to JSON; persisting that snapshot on every
//! command is what makes the countdown recoverable after process death
//! (see [`super::recovery`]).

use serde::{Deserialize, Serialize};

use crate::events::{at_from_ms, Event};
use crate::session::local_start_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Elapsed time handed to the session recorder when a countdown ends.
#[derive(Debug, Clone, Copy)]
pub struct Stopped {
    /// Epoch ms of the original start.
    pub started_at_ms: u64,
    /// Seconds the countdown actually ran.
    pub elapsed_secs: i64,
    /// Seconds the user originally asked for.
    pub planned_secs: i64,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread. At most one
/// countdown exists; `start` while one is underway is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    state: TimerState,
    /// Planned countdown length in milliseconds.
    duration_ms: u64,
    /// Epoch ms of the original start. Recorded to the journal.
    started_at_ms: Option<u64>,
    /// Anchor for remaining-time math. Equals `started_at_ms` until a
    /// pause; rebased on resume so paused time does not count down.
    anchor_ms: Option<u64>,
    /// Remaining time latched while paused.
    #[serde(default)]
    paused_remaining_ms: Option<u64>,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            duration_ms: 0,
            started_at_ms: None,
            anchor_ms: None,
            paused_remaining_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TimerState::Idle
    }

    pub fn total_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn planned_secs(&self) -> i64 {
        (self.duration_ms / 1000) as i64
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    /// Remaining time at `now_ms`, recomputed from the anchor timestamp.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Paused => self.paused_remaining_ms.unwrap_or(0),
            TimerState::Running => {
                let anchor = self.anchor_ms.unwrap_or(now_ms);
                let elapsed = now_ms.saturating_sub(anchor);
                self.duration_ms.saturating_sub(elapsed)
            }
        }
    }

    /// Build a full state snapshot event, the read-only projection
    /// observers see.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_ms: self.remaining_ms(now_ms),
            total_ms: self.duration_ms,
            at: at_from_ms(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown of `duration_ms`. Only valid from `Idle`.
    pub fn start(&mut self, duration_ms: u64, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None; // A countdown already exists.
        }
        self.state = TimerState::Running;
        self.duration_ms = duration_ms;
        self.started_at_ms = Some(now_ms);
        self.anchor_ms = Some(now_ms);
        self.paused_remaining_ms = None;
        Some(Event::TimerStarted {
            duration_secs: (duration_ms / 1000) as i64,
            at: at_from_ms(now_ms),
        })
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` once the
    /// countdown reaches zero; the realized duration is the planned one.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Running || self.remaining_ms(now_ms) > 0 {
            return None;
        }
        let started_at_ms = self.started_at_ms.unwrap_or(now_ms);
        let planned_secs = self.planned_secs();
        self.clear();
        Some(Event::TimerCompleted {
            planned_secs,
            started_at: local_start_time(started_at_ms),
            at: at_from_ms(now_ms),
        })
    }

    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let remaining = self.remaining_ms(now_ms);
        self.state = TimerState::Paused;
        self.paused_remaining_ms = Some(remaining);
        self.anchor_ms = None;
        Some(Event::TimerPaused {
            remaining_ms: remaining,
            at: at_from_ms(now_ms),
        })
    }

    /// Restart ticking from a pause without resetting elapsed credit.
    pub fn resume(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let remaining = self.paused_remaining_ms.unwrap_or(0);
        // Rebase the anchor so remaining = duration - (now - anchor) holds.
        self.anchor_ms = Some(now_ms.saturating_sub(self.duration_ms.saturating_sub(remaining)));
        self.paused_remaining_ms = None;
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_ms: remaining,
            at: at_from_ms(now_ms),
        })
    }

    /// Cancel the countdown and return the elapsed time for recording.
    pub fn stop(&mut self, now_ms: u64) -> Option<Stopped> {
        if self.state == TimerState::Idle {
            return None;
        }
        let remaining = self.remaining_ms(now_ms);
        let stopped = Stopped {
            started_at_ms: self.started_at_ms.unwrap_or(now_ms),
            elapsed_secs: (self.duration_ms.saturating_sub(remaining) / 1000) as i64,
            planned_secs: self.planned_secs(),
        };
        self.clear();
        Some(stopped)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear(&mut self) {
        self.state = TimerState::Idle;
        self.duration_ms = 0;
        self.started_at_ms = None;
        self.anchor_ms = None;
        self.paused_remaining_ms = None;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000_000;
    const MIN: u64 = 60_000;

    #[test]
    fn start_runs_countdown() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.state(), TimerState::Idle);

        let event = engine.start(10 * MIN, T0);
        assert!(matches!(
            event,
            Some(Event::TimerStarted {
                duration_secs: 600,
                ..
            })
        ));
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.remaining_ms(T0 + 3 * MIN), 7 * MIN);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        assert!(engine.start(5 * MIN, T0 + MIN).is_none());
        assert_eq!(engine.total_ms(), 10 * MIN);
    }

    #[test]
    fn tick_before_expiry_yields_nothing() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        assert!(engine.tick(T0 + 9 * MIN).is_none());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn tick_at_expiry_completes_with_planned_duration() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        // Well past the deadline: missed ticks fast-forward silently.
        let event = engine.tick(T0 + 25 * MIN);
        match event {
            Some(Event::TimerCompleted { planned_secs, .. }) => {
                assert_eq!(planned_secs, 600);
            }
            other => panic!("expected TimerCompleted, got {other:?}"),
        }
        assert!(engine.is_idle());
        // A second tick produces no second completion.
        assert!(engine.tick(T0 + 26 * MIN).is_none());
    }

    #[test]
    fn pause_latches_remaining_and_resume_rebases() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);

        let event = engine.pause(T0 + 4 * MIN);
        assert!(matches!(
            event,
            Some(Event::TimerPaused {
                remaining_ms,
                ..
            }) if remaining_ms == 6 * MIN
        ));
        // Time passing while paused does not count down.
        assert_eq!(engine.remaining_ms(T0 + 30 * MIN), 6 * MIN);

        engine.resume(T0 + 30 * MIN);
        assert_eq!(engine.state(), TimerState::Running);
        assert_eq!(engine.remaining_ms(T0 + 32 * MIN), 4 * MIN);
    }

    #[test]
    fn stop_returns_elapsed_excluding_pauses() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        engine.pause(T0 + 4 * MIN);
        engine.resume(T0 + 20 * MIN);

        let stopped = engine.stop(T0 + 22 * MIN).unwrap();
        assert_eq!(stopped.elapsed_secs, 6 * 60);
        assert_eq!(stopped.planned_secs, 600);
        assert_eq!(stopped.started_at_ms, T0);
        assert!(engine.is_idle());
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let mut engine = TimerEngine::new();
        assert!(engine.stop(T0).is_none());
    }

    #[test]
    fn pause_resume_only_valid_from_their_states() {
        let mut engine = TimerEngine::new();
        assert!(engine.pause(T0).is_none());
        assert!(engine.resume(T0).is_none());
        engine.start(MIN, T0);
        assert!(engine.resume(T0).is_none());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        engine.pause(T0 + MIN);

        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.remaining_ms(T0 + 5 * MIN), 9 * MIN);
    }

    #[test]
    fn snapshot_event_reports_remaining() {
        let mut engine = TimerEngine::new();
        engine.start(10 * MIN, T0);
        match engine.snapshot(T0 + MIN) {
            Event::StateSnapshot {
                state,
                remaining_ms,
                total_ms,
                ..
            } => {
                assert_eq!(state, TimerState::Running);
                assert_eq!(remaining_ms, 9 * MIN);
                assert_eq!(total_ms, 10 * MIN);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
