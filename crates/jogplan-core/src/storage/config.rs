//! TOML-based application configuration.
//!
//! Stores:
//! - Operating hours, lookahead and day-part strategy for the scheduler
//! - Sub-session durations (pre-jog, jog, post-jog)
//! - Time-of-day and weekday preferences
//!
//! Configuration is stored at `~/.config/jogplan/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::schedule::{DayPart, Preferences, SessionPlan};
use crate::scheduler::{SchedulerConfig, MAX_LOOKAHEAD_DAYS};

/// Sub-session durations in minutes; zero skips the part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default)]
    pub pre_jog_minutes: u32,
    #[serde(default = "default_jog_minutes")]
    pub jog_minutes: u32,
    #[serde(default)]
    pub post_jog_minutes: u32,
}

impl SessionsConfig {
    pub fn plan(&self) -> Result<SessionPlan, ValidationError> {
        SessionPlan::from_minutes(
            i64::from(self.pre_jog_minutes),
            i64::from(self.jog_minutes),
            i64::from(self.post_jog_minutes),
        )
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/jogplan/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default = "default_preferences")]
    pub preferences: Preferences,
}

// Default functions
fn default_jog_minutes() -> u32 {
    25
}
fn default_preferences() -> Preferences {
    Preferences::new(
        [DayPart::Morning, DayPart::Afternoon],
        [Weekday::Mon, Weekday::Wed, Weekday::Fri],
    )
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            pre_jog_minutes: 0,
            jog_minutes: default_jog_minutes(),
            post_jog_minutes: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            sessions: SessionsConfig::default(),
            preferences: default_preferences(),
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.day_start >= self.scheduler.day_end {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.day_end".to_string(),
                message: format!(
                    "must be later than day_start ({})",
                    self.scheduler.day_start
                ),
            });
        }
        if self.scheduler.lookahead_days > MAX_LOOKAHEAD_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.lookahead_days".to_string(),
                message: format!("must be at most {MAX_LOOKAHEAD_DAYS}"),
            });
        }
        self.sessions.plan().map_err(|e| ConfigError::InvalidValue {
            key: "sessions".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
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

    /// Set a config value by key. The caller persists with `save`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or violates a constraint; `self` is unchanged in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
