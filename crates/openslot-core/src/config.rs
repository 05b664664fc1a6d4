//! TOML-based engine configuration.
//!
//! Stores operator-tunable defaults:
//! - Unknown-day and disallowed-day policies
//! - Default result limit
//! - Fetch fan-out tuning (concurrency, timeout, retries, backoff)
//!
//! Configuration is stored at `~/.config/openslot/config.toml`. These are
//! only defaults the caller folds into a query; the engine itself reads
//! nothing ambient.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::query::{DisallowedDayPolicy, UnknownDayPolicy};

/// Policy defaults applied to queries that do not set them explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub unknown_day: UnknownDayPolicy,
    #[serde(default)]
    pub disallowed_day: DisallowedDayPolicy,
    /// Default maximum number of candidates to return.
    #[serde(default)]
    pub result_limit: Option<usize>,
}

/// Tuning for the bounded provider fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

fn default_max_concurrency() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/openslot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("openslot")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::load_from(Self::default_path()).unwrap_or_default()
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.policy.unknown_day, UnknownDayPolicy::Free);
        assert_eq!(config.policy.disallowed_day, DisallowedDayPolicy::Bridge);
        assert_eq!(config.policy.result_limit, None);
        assert_eq!(config.fetch.max_concurrency, 4);
        assert_eq!(config.fetch.max_retries, 3);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.policy.unknown_day = UnknownDayPolicy::Busy;
        config.policy.result_limit = Some(5);
        config.fetch.max_concurrency = 8;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.policy.unknown_day, UnknownDayPolicy::Busy);
        assert_eq!(loaded.policy.result_limit, Some(5));
        assert_eq!(loaded.fetch.max_concurrency, 8);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[policy]\nunknown_day = \"busy\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.policy.unknown_day, UnknownDayPolicy::Busy);
        assert_eq!(loaded.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = Config::load_from("/nonexistent/openslot/config.toml");
        assert!(loaded.is_err());
    }
}
