//! # Zafu Core Library
//!
//! This library provides the core logic for the Zafu meditation timer.
//! It implements a CLI-first philosophy where all operations are available
//! from the core library, with any front end being a thin layer over it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based countdown state machine that
//!   requires the caller to periodically invoke `tick()`; it is serialized
//!   whole into durable storage so a later process can resume or settle it
//! - **Storage**: SQLite-based session journal and TOML-based configuration
//! - **Stats**: consecutive-day streaks and aggregate totals over the journal
//! - **Journal**: JSON export/import of all recorded sessions
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`Database`]: session journal and key-value persistence
//! - [`Config`]: user preferences
//! - [`StreakData`]: derived streak statistics

pub mod error;
pub mod events;
pub mod journal;
pub mod session;
pub mod sounds;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use session::{Outcome, Session, MIN_SESSION_SECS};
pub use sounds::AlertSound;
pub use stats::{StreakData, Totals};
pub use storage::{Config, Database};
pub use timer::{Recovered, SessionLength, TimerEngine, TimerState};
