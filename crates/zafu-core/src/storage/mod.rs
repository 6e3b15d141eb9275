mod config;
pub mod database;

pub use config::{AlertsConfig, Config, ThemeMode, TimerConfig, UiConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/zafu[-dev]/` based on ZAFU_ENV.
///
/// Set ZAFU_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ZAFU_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("zafu-dev")
    } else {
        base_dir.join("zafu")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
