//! SQLite-based journal storage.
//!
//! Provides persistent storage for:
//! - Completed meditation sessions
//! - A key-value store for durable application state (timer snapshots)

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};

use crate::error::DatabaseError;
use crate::session::Session;

use super::data_dir;

/// Storage format for session start times. `%.f` tolerates an optional
/// fractional part on parse and emits none for whole seconds, so the
/// column stays lexicographically sortable.
const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// SQLite database for the session journal.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/zafu/zafu.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
            .join("zafu.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path,
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time       TEXT NOT NULL,
                duration         INTEGER NOT NULL,
                planned_duration INTEGER NOT NULL,
                note             TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_start_time ON sessions(start_time);",
        )?;
        Ok(())
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Insert a session with a fresh id. Returns the assigned id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn insert_session(&self, session: &Session) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (start_time, duration, planned_duration, note)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.start_time.format(DATETIME_FMT).to_string(),
                session.duration,
                session.planned_duration,
                session.note,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert-or-replace a batch of sessions in one transaction (import path).
    ///
    /// A record with id 0 gets a fresh id; any other id replaces by primary
    /// key. Nothing is applied if any insert fails.
    ///
    /// # Errors
    /// Returns an error if the transaction fails; the journal is unchanged.
    pub fn import_sessions(&self, sessions: &[Session]) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        for session in sessions {
            let start_time = session.start_time.format(DATETIME_FMT).to_string();
            if session.id > 0 {
                tx.execute(
                    "INSERT OR REPLACE INTO sessions (id, start_time, duration, planned_duration, note)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        session.id,
                        start_time,
                        session.duration,
                        session.planned_duration,
                        session.note,
                    ],
                )?;
            } else {
                tx.execute(
                    "INSERT INTO sessions (start_time, duration, planned_duration, note)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        start_time,
                        session.duration,
                        session.planned_duration,
                        session.note,
                    ],
                )?;
            }
        }
        tx.commit()?;
        Ok(sessions.len())
    }

    /// Update only the note of a session. Returns false for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_note(&self, id: i64, note: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE sessions SET note = ?2 WHERE id = ?1",
            params![id, note],
        )?;
        Ok(changed > 0)
    }

    /// Delete a session. Returns false for an unknown id.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_session(&self, id: i64) -> Result<bool, DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn session_by_id(&self, id: i64) -> Result<Option<Session>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, start_time, duration, planned_duration, note
             FROM sessions WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id], row_to_session);
        match result {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All sessions, newest first (the journal listing order).
    pub fn all_sessions(&self) -> Result<Vec<Session>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, start_time, duration, planned_duration, note
             FROM sessions ORDER BY start_time DESC",
        )?;
        let rows = stmt.query_map([], row_to_session)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    pub fn session_count(&self) -> Result<u64, DatabaseError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Sum of recorded durations, in seconds.
    pub fn total_seconds(&self) -> Result<i64, DatabaseError> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(duration), 0) FROM sessions",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store. A single synchronous put; this is the
    /// only durability guarantee the timer snapshot relies on.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<Session> {
    let start_text: String = row.get(1)?;
    let start_time = NaiveDateTime::parse_from_str(&start_text, DATETIME_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Session {
        id: row.get(0)?,
        start_time,
        duration: row.get(2)?,
        planned_duration: row.get(3)?,
        note: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session_at(day: u32, hour: u32) -> Session {
        Session {
            id: 0,
            start_time: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            duration: 600,
            planned_duration: 600,
            note: String::new(),
        }
    }

    #[test]
    fn insert_and_list() {
        let db = Database::open_memory().unwrap();
        db.insert_session(&session_at(1, 7)).unwrap();
        db.insert_session(&session_at(2, 7)).unwrap();

        let sessions = db.all_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        // Newest first.
        assert_eq!(sessions[0].start_time, session_at(2, 7).start_time);
        assert_eq!(db.session_count().unwrap(), 2);
        assert_eq!(db.total_seconds().unwrap(), 1200);
    }

    #[test]
    fn update_note_touches_only_the_note() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_session(&session_at(1, 7)).unwrap();

        assert!(db.update_note(id, "calm morning").unwrap());
        let session = db.session_by_id(id).unwrap().unwrap();
        assert_eq!(session.note, "calm morning");
        assert_eq!(session.duration, 600);
        assert_eq!(session.planned_duration, 600);
        assert_eq!(session.start_time, session_at(1, 7).start_time);
    }

    #[test]
    fn update_note_unknown_id() {
        let db = Database::open_memory().unwrap();
        assert!(!db.update_note(999, "x").unwrap());
    }

    #[test]
    fn delete_session() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_session(&session_at(1, 7)).unwrap();
        assert!(db.delete_session(id).unwrap());
        assert!(!db.delete_session(id).unwrap());
        assert_eq!(db.session_count().unwrap(), 0);
    }

    #[test]
    fn import_replaces_by_id_and_assigns_fresh_ones() {
        let db = Database::open_memory().unwrap();
        let id = db.insert_session(&session_at(1, 7)).unwrap();

        let mut replacement = session_at(1, 9);
        replacement.id = id;
        let fresh = session_at(3, 7);
        db.import_sessions(&[replacement, fresh]).unwrap();

        assert_eq!(db.session_count().unwrap(), 2);
        let kept = db.session_by_id(id).unwrap().unwrap();
        assert_eq!(kept.start_time.time().to_string(), "09:00:00");
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }
}
