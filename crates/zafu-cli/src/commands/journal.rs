use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use zafu_core::session::{self, Outcome};
use zafu_core::{journal, Database};

#[derive(Subcommand)]
pub enum JournalAction {
    /// List all sessions, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a session by hand
    Add {
        /// Length in minutes
        #[arg(long, short)]
        minutes: u32,
        /// Start date-time, e.g. 2024-05-01T07:30:00 (default: now)
        #[arg(long)]
        at: Option<NaiveDateTime>,
        /// Attach a note
        #[arg(long)]
        note: Option<String>,
    },
    /// Edit the note of a session
    Note {
        /// Session id
        id: i64,
        /// New note text (empty clears it)
        text: String,
    },
    /// Delete a session
    Delete {
        /// Session id
        id: i64,
    },
    /// Export the journal to a JSON file
    Export {
        /// Destination path
        path: PathBuf,
    },
    /// Import sessions from a JSON file
    Import {
        /// Source path
        path: PathBuf,
    },
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        JournalAction::List { json } => {
            let sessions = db.all_sessions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("the journal is empty");
            } else {
                for s in &sessions {
                    let minutes = s.duration / 60;
                    let seconds = s.duration % 60;
                    let note = if s.note.is_empty() {
                        String::new()
                    } else {
                        format!("  # {}", s.note)
                    };
                    println!(
                        "{:>4}  {}  {:>3}m{:02}s{}",
                        s.id,
                        s.start_time.format("%Y-%m-%d %H:%M"),
                        minutes,
                        seconds,
                        note
                    );
                }
            }
        }
        JournalAction::Add { minutes, at, note } => {
            let start = at.unwrap_or_else(|| Local::now().naive_local());
            let secs = minutes as i64 * 60;
            // Manual adds pass through the same recorder as the timer.
            match session::record(&db, start, secs, secs)? {
                Outcome::Recorded(mut session) => {
                    if let Some(text) = note {
                        db.update_note(session.id, &text)?;
                        session.note = text;
                    }
                    println!("{}", serde_json::to_string_pretty(&session)?);
                }
                Outcome::TooShort { .. } => {
                    eprintln!(
                        "sessions under {} seconds are not recorded",
                        zafu_core::MIN_SESSION_SECS
                    );
                }
            }
        }
        JournalAction::Note { id, text } => {
            if db.update_note(id, &text)? {
                println!("ok");
            } else {
                return Err(format!("no session with id {id}").into());
            }
        }
        JournalAction::Delete { id } => {
            if db.delete_session(id)? {
                println!("ok");
            } else {
                return Err(format!("no session with id {id}").into());
            }
        }
        JournalAction::Export { path } => {
            let count = journal::export_to_path(&db, &path)?;
            println!("exported {count} sessions to {}", path.display());
        }
        JournalAction::Import { path } => {
            let count = journal::import_from_path(&db, &path)?;
            println!("imported {count} sessions from {}", path.display());
        }
    }
    Ok(())
}
