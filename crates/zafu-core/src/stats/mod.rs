//! Statistics over the session journal.
//!
//! Everything here is derived, never stored: streaks and totals are
//! recomputed from the full session set whenever it changes.

mod streaks;
mod totals;

pub use streaks::{streak_data, StreakData};
pub use totals::{totals, Totals};
