pub mod engine;
pub mod recovery;

pub use engine::{Stopped, TimerEngine, TimerState};
pub use recovery::Recovered;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-chosen session length, kept in the hours/minutes/seconds shape
/// the duration picker works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLength {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl SessionLength {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }

    pub fn total_ms(&self) -> u64 {
        self.total_secs().saturating_mul(1000)
    }

    pub fn is_zero(&self) -> bool {
        self.total_secs() == 0
    }
}

impl Default for SessionLength {
    /// Ten minutes, the duration picker's starting value.
    fn default() -> Self {
        Self::new(0, 10, 0)
    }
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            write!(f, "{:02}:{:02}", self.minutes, self.seconds)
        }
    }
}
