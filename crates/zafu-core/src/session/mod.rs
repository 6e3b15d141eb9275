//! Session model and recorder.
//!
//! A session is one completed (or manually logged) meditation interval.
//! The recorder applies the minimum-duration policy uniformly: natural
//! completion, manual stop, and recovery-after-restart all pass through
//! [`record`].

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::storage::Database;

/// Sessions shorter than this are discarded, not recorded.
pub const MIN_SESSION_SECS: i64 = 30;

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    /// Local date-time the session began (no offset, like the journal shows it).
    pub start_time: NaiveDateTime,
    /// Seconds actually meditated.
    pub duration: i64,
    /// Seconds the user asked for before starting.
    pub planned_duration: i64,
    #[serde(default)]
    pub note: String,
}

/// What became of a finished countdown.
#[derive(Debug, Clone)]
pub enum Outcome {
    Recorded(Session),
    /// Under [`MIN_SESSION_SECS`]; nothing was persisted.
    TooShort { actual_secs: i64 },
}

impl Outcome {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Outcome::Recorded(session) => Some(session),
            Outcome::TooShort { .. } => None,
        }
    }

    /// The event this outcome corresponds to.
    pub fn to_event(&self, at: chrono::DateTime<chrono::Utc>) -> crate::events::Event {
        match self {
            Outcome::Recorded(session) => crate::events::Event::SessionRecorded {
                session_id: session.id,
                duration_secs: session.duration,
                at,
            },
            Outcome::TooShort { actual_secs } => crate::events::Event::SessionDiscarded {
                actual_secs: *actual_secs,
                at,
            },
        }
    }
}

/// Persist a finished countdown, or discard it if it ran under the minimum.
///
/// Callers recompute streaks after a `Recorded` outcome; the journal is
/// untouched on `TooShort`.
///
/// # Errors
/// Returns an error if the insert fails.
pub fn record(
    db: &Database,
    start_time: NaiveDateTime,
    actual_secs: i64,
    planned_secs: i64,
) -> Result<Outcome, DatabaseError> {
    if actual_secs < MIN_SESSION_SECS {
        log::debug!("discarding {actual_secs}s session, under the {MIN_SESSION_SECS}s minimum");
        return Ok(Outcome::TooShort {
            actual_secs,
        });
    }
    let mut session = Session {
        id: 0,
        start_time,
        duration: actual_secs,
        planned_duration: planned_secs,
        note: String::new(),
    };
    session.id = db.insert_session(&session)?;
    Ok(Outcome::Recorded(session))
}

/// Epoch milliseconds to the local date-time stored in the journal.
pub fn local_start_time(epoch_ms: u64) -> NaiveDateTime {
    Local
        .timestamp_millis_opt(epoch_ms as i64)
        .single()
        .map(|dt| dt.naive_local())
        .unwrap_or_else(|| Local::now().naive_local())
}
