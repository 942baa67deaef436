//! TOML-based application configuration.
//!
//! Stores the default user id and the calendar sync settings (calendar id,
//! API endpoint, request timeout, batch query limit).
//!
//! Configuration is stored at `~/.config/duesync/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::sync::GoogleCalendarClient;

/// Calendar sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Target calendar (Google's "primary" by default).
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// Calendar API base URL. Overridable for testing against a mock.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout; each external call is attempted exactly once.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Upper bound on tasks examined per batch sync run.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/duesync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// User id that owns tasks and receives notifications.
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_user() -> String {
    "local".to_string()
}
fn default_calendar_id() -> String {
    "primary".to_string()
}
fn default_api_base_url() -> String {
    GoogleCalendarClient::DEFAULT_BASE_URL.to_string()
}
fn default_http_timeout_secs() -> u64 {
    10
}
fn default_batch_limit() -> usize {
    50
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            batch_limit: default_batch_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: "~/.config/duesync".into(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path (missing file yields defaults).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a value by dotted key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "user" => Ok(self.user.clone()),
            "sync.calendar_id" => Ok(self.sync.calendar_id.clone()),
            "sync.api_base_url" => Ok(self.sync.api_base_url.clone()),
            "sync.http_timeout_secs" => Ok(self.sync.http_timeout_secs.to_string()),
            "sync.batch_limit" => Ok(self.sync.batch_limit.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Set a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "user" => self.user = value.to_string(),
            "sync.calendar_id" => self.sync.calendar_id = value.to_string(),
            "sync.api_base_url" => self.sync.api_base_url = value.to_string(),
            "sync.http_timeout_secs" => {
                self.sync.http_timeout_secs =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("expected a number of seconds, got {value:?}"),
                    })?;
            }
            "sync.batch_limit" => {
                self.sync.batch_limit = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected a count, got {value:?}"),
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// All keys and their current values, for `config list`.
    pub fn list(&self) -> Vec<(&'static str, String)> {
        vec![
            ("user", self.user.clone()),
            ("sync.calendar_id", self.sync.calendar_id.clone()),
            ("sync.api_base_url", self.sync.api_base_url.clone()),
            (
                "sync.http_timeout_secs",
                self.sync.http_timeout_secs.to_string(),
            ),
            ("sync.batch_limit", self.sync.batch_limit.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.user, "local");
        assert_eq!(config.sync.calendar_id, "primary");
        assert_eq!(config.sync.http_timeout_secs, 10);
        assert_eq!(config.sync.batch_limit, 50);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("user", "alice").unwrap();
        config.set("sync.http_timeout_secs", "5").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user, "alice");
        assert_eq!(loaded.sync.http_timeout_secs, 5);
    }

    #[test]
    fn unknown_and_invalid_keys_are_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.get("sync.nope"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("sync.http_timeout_secs", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "user = \"bob\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.user, "bob");
        assert_eq!(config.sync.batch_limit, 50);
    }
}
