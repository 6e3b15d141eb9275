//! JSON export/import of the session journal.
//!
//! The exchange format is a single JSON array of
//! `{id, startTime, duration, plannedDuration, note}` objects, with
//! `startTime` as an ISO-8601 local date-time. Import parses the whole
//! document before touching the journal and applies it in one transaction:
//! malformed input aborts with no rows applied. An absent or zero `id`
//! means "assign new"; anything else replaces by primary key, so importing
//! the same file twice duplicates rows only when ids don't coincide.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::session::Session;
use crate::storage::Database;

/// The wire shape of one session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportedSession {
    #[serde(default)]
    id: i64,
    start_time: NaiveDateTime,
    duration: i64,
    planned_duration: i64,
    #[serde(default)]
    note: String,
}

impl From<&Session> for ExportedSession {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            start_time: session.start_time,
            duration: session.duration,
            planned_duration: session.planned_duration,
            note: session.note.clone(),
        }
    }
}

impl From<ExportedSession> for Session {
    fn from(exported: ExportedSession) -> Self {
        Self {
            id: exported.id,
            start_time: exported.start_time,
            duration: exported.duration,
            planned_duration: exported.planned_duration,
            note: exported.note,
        }
    }
}

/// Write every session to `path`. Returns the number exported.
///
/// # Errors
/// Returns an error if the journal cannot be read or the file written;
/// the caller surfaces it as a transient failure message.
pub fn export_to_path(db: &Database, path: &Path) -> Result<usize, CoreError> {
    let sessions = db.all_sessions()?;
    let records: Vec<ExportedSession> = sessions.iter().map(ExportedSession::from).collect();

    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), &records)?;
    log::info!("exported {} sessions to {}", records.len(), path.display());
    Ok(records.len())
}

/// Read a journal file and insert its sessions. Returns the number imported.
///
/// # Errors
/// Returns an error on unreadable or malformed input, in which case the
/// journal is unchanged.
pub fn import_from_path(db: &Database, path: &Path) -> Result<usize, CoreError> {
    let file = File::open(path)?;
    let records: Vec<ExportedSession> = serde_json::from_reader(BufReader::new(file))?;
    let sessions: Vec<Session> = records.into_iter().map(Session::from).collect();

    let count = db.import_sessions(&sessions)?;
    log::info!("imported {} sessions from {}", count, path.display());
    Ok(count)
}
