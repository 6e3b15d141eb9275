pub mod config;
pub mod journal;
pub mod sounds;
pub mod stats;
pub mod timer;

/// Current wall clock as epoch milliseconds, the engine's time base.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
