//! Durable timer snapshots and crash recovery.
//!
//! The engine is serialized whole into the kv store on every command. When a
//! process comes back up it calls [`settle`] before doing anything else:
//! a countdown with time left resumes from the wall-clock residue, and a
//! countdown that expired while nobody was running is settled as a
//! completed-while-away session.
//!
//! The snapshot is cleared the moment it is consumed -- before the session
//! insert -- so repeated restarts record at most one session per start.
//! Clock changes are not compensated; elapsed time is a wall-clock delta.

use crate::error::CoreError;
use crate::session::{self, local_start_time, Outcome};
use crate::storage::Database;

use super::engine::{TimerEngine, TimerState};

/// kv key holding the serialized engine.
pub const SNAPSHOT_KEY: &str = "timer_snapshot";

/// What `settle` found in durable storage.
#[derive(Debug)]
pub enum Recovered {
    /// No snapshot, or an idle one.
    Nothing,
    /// A countdown is still underway (running with time left, or paused);
    /// ticking continues from the residue.
    InProgress { remaining_ms: u64 },
    /// The countdown expired while no process was alive. The session has
    /// been run through the recorder with the original start time and the
    /// full planned duration.
    CompletedWhileAway(Outcome),
}

/// Load the engine from its durable snapshot.
///
/// A missing snapshot is an idle engine. A corrupt one is logged, cleared,
/// and treated as "nothing to recover" -- never an error.
pub fn load(db: &Database) -> TimerEngine {
    match db.kv_get(SNAPSHOT_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerEngine>(&json) {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("discarding corrupt timer snapshot: {e}");
                let _ = db.kv_delete(SNAPSHOT_KEY);
                TimerEngine::new()
            }
        },
        Ok(None) => TimerEngine::new(),
        Err(e) => {
            log::warn!("could not read timer snapshot: {e}");
            TimerEngine::new()
        }
    }
}

/// Persist the engine. An idle engine clears the snapshot instead, so stop
/// and completion leave no durable record behind.
///
/// # Errors
/// Returns an error if the kv write fails.
pub fn save(db: &Database, engine: &TimerEngine) -> Result<(), CoreError> {
    if engine.is_idle() {
        db.kv_delete(SNAPSHOT_KEY)?;
        return Ok(());
    }
    let json = serde_json::to_string(engine)?;
    db.kv_set(SNAPSHOT_KEY, &json)?;
    Ok(())
}

/// Reconcile the durable snapshot with the current wall clock.
///
/// Call on process start, before dispatching any timer command. Returns the
/// engine to keep driving plus what was recovered.
///
/// # Errors
/// Returns an error if storage fails; the caller falls back to an idle
/// engine and an unchanged journal.
pub fn settle(db: &Database, now_ms: u64) -> Result<(TimerEngine, Recovered), CoreError> {
    let mut engine = load(db);
    match engine.state() {
        TimerState::Idle => Ok((engine, Recovered::Nothing)),
        TimerState::Paused => {
            let remaining_ms = engine.remaining_ms(now_ms);
            Ok((engine, Recovered::InProgress { remaining_ms }))
        }
        TimerState::Running => {
            let remaining = engine.remaining_ms(now_ms);
            if remaining > 0 {
                return Ok((engine, Recovered::InProgress { remaining_ms: remaining }));
            }
            // Expired while away. Consume the snapshot first: a crash after
            // this point loses the session rather than double-recording it.
            db.kv_delete(SNAPSHOT_KEY)?;
            let started_at_ms = engine.started_at_ms().unwrap_or(now_ms);
            let planned_secs = engine.planned_secs();
            let outcome = session::record(
                db,
                local_start_time(started_at_ms),
                planned_secs,
                planned_secs,
            )?;
            engine = TimerEngine::new();
            Ok((engine, Recovered::CompletedWhileAway(outcome)))
        }
    }
}
