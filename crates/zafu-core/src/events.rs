use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// The CLI prints these; a front end would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        duration_secs: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero; realized duration equals the planned one.
    TimerCompleted {
        planned_secs: i64,
        started_at: NaiveDateTime,
        at: DateTime<Utc>,
    },
    /// User stopped the countdown before it finished.
    TimerStopped {
        elapsed_secs: i64,
        at: DateTime<Utc>,
    },
    SessionRecorded {
        session_id: i64,
        duration_secs: i64,
        at: DateTime<Utc>,
    },
    /// A finished or aborted countdown fell under the minimum duration
    /// and was discarded instead of recorded.
    SessionDiscarded {
        actual_secs: i64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_ms: u64,
        total_ms: u64,
        at: DateTime<Utc>,
    },
}

/// Epoch milliseconds to a UTC timestamp for event payloads.
pub(crate) fn at_from_ms(epoch_ms: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64).unwrap_or_default()
}
