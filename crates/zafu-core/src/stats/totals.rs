//! Aggregate totals over the journal.

use chrono::NaiveDate;
use rusqlite::params;
use serde::Serialize;

use crate::error::DatabaseError;
use crate::storage::Database;

/// Aggregate journal statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Totals {
    pub sessions: u64,
    pub total_secs: i64,
    pub today_sessions: u64,
    pub today_secs: i64,
}

/// Compute totals for the whole journal plus `today`'s slice.
///
/// # Errors
/// Returns an error if a query fails.
pub fn totals(db: &Database, today: NaiveDate) -> Result<Totals, DatabaseError> {
    let mut stats = Totals {
        sessions: db.session_count()?,
        total_secs: db.total_seconds()?,
        ..Totals::default()
    };

    // The start_time column is ISO text, so day slicing is a range scan.
    let day_start = format!("{today}T00:00:00");
    let day_end = match today.succ_opt() {
        Some(tomorrow) => format!("{tomorrow}T00:00:00"),
        None => return Ok(stats),
    };
    let row = db.conn().query_row(
        "SELECT COUNT(*), COALESCE(SUM(duration), 0)
         FROM sessions
         WHERE start_time >= ?1 AND start_time < ?2",
        params![day_start, day_end],
        |row| Ok((row.get::<_, u64>(0)?, row.get::<_, i64>(1)?)),
    )?;
    stats.today_sessions = row.0;
    stats.today_secs = row.1;

    Ok(stats)
}
