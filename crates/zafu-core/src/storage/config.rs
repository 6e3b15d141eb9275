//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The last chosen session length and the keep-screen-on policy
//! - Alert sound selection, cue volume, and the do-not-disturb intent
//! - Theme mode
//!
//! Configuration is stored at `~/.config/zafu/config.toml`.
//!
//! The do-not-disturb flag only records intent; actually muting the OS is
//! left to an external collaborator, and its absence is a degraded state,
//! not an error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::sounds::AlertSound;
use crate::timer::SessionLength;

use super::data_dir;

/// Timer-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// The duration preselected on the next start.
    #[serde(default)]
    pub last_duration: SessionLength,
    #[serde(default = "default_true")]
    pub keep_screen_on: bool,
}

/// Alert cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Id of the cue played on start, stop, and completion.
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_volume")]
    pub volume: u32,
    /// Ask the environment to hold notifications while a session runs.
    #[serde(default)]
    pub do_not_disturb: bool,
}

/// Theme selection for front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    System,
    Light,
    Dark,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: ThemeMode,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/zafu/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_sound() -> String {
    AlertSound::default_id().to_string()
}
fn default_volume() -> u32 {
    60
}
fn default_theme() -> ThemeMode {
    ThemeMode::System
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            last_duration: SessionLength::default(),
            keep_screen_on: true,
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            sound: default_sound(),
            volume: default_volume(),
            do_not_disturb: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/zafu"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// or violates a constraint, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate(key)?;
        *self = updated;
        self.save()?;
        Ok(())
    }

    /// The cue to play, resolved against the catalog (unknown ids fall
    /// back to the default sound).
    pub fn alert_sound(&self) -> &'static AlertSound {
        AlertSound::resolve(&self.alerts.sound)
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if AlertSound::by_id(&self.alerts.sound).is_none() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("unknown alert sound '{}'", self.alerts.sound),
            });
        }
        if self.alerts.volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "volume must be between 0 and 100".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.ui.theme, ThemeMode::System);
        assert_eq!(parsed.alerts.volume, 60);
        assert!(parsed.timer.keep_screen_on);
        assert_eq!(parsed.timer.last_duration.total_secs(), 600);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.keep_screen_on").as_deref(), Some("true"));
        assert_eq!(cfg.get("alerts.sound").as_deref(), Some("bowl_singing"));
        assert_eq!(cfg.get("ui.theme").as_deref(), Some("system"));
        assert!(cfg.get("ui.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "alerts.do_not_disturb", "true").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "alerts.do_not_disturb").unwrap(),
            &serde_json::Value::Bool(true)
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "alerts.volume", "75").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "alerts.volume").unwrap(),
            &serde_json::Value::Number(75.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "ui.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result =
            Config::set_json_value_by_path(&mut json, "timer.keep_screen_on", "not_a_bool");
        assert!(result.is_err());
    }

    #[test]
    fn theme_values_round_trip_through_json_shape() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "ui.theme", "dark").unwrap();
        let cfg: Config = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.ui.theme, ThemeMode::Dark);

        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "ui.theme", "plaid").unwrap();
        assert!(serde_json::from_value::<Config>(json).is_err());
    }

    #[test]
    fn validate_rejects_unknown_sound_and_loud_volume() {
        let mut cfg = Config::default();
        cfg.alerts.sound = "air_horn".to_string();
        assert!(cfg.validate("alerts.sound").is_err());

        let mut cfg = Config::default();
        cfg.alerts.volume = 130;
        assert!(cfg.validate("alerts.volume").is_err());
    }

    #[test]
    fn unknown_sound_resolves_to_default_on_read() {
        let mut cfg = Config::default();
        cfg.alerts.sound = "air_horn".to_string();
        assert_eq!(cfg.alert_sound().id, AlertSound::default_id());
    }

    #[test]
    fn last_duration_nests_in_the_json_shape() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.last_duration.minutes").as_deref(), Some("10"));
    }
}
