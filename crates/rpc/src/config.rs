//! Application configuration
//!
//! Defaults can be overridden by a JSON file and then by environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_DATA_DIR: &str = "LOCKBOX_DATA_DIR";
pub const ENV_BUS_CAPACITY: &str = "LOCKBOX_BUS_CAPACITY";
pub const ENV_JOURNAL: &str = "LOCKBOX_JOURNAL";

/// Errors while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the Lockbox application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory for the audit journal
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Events buffered per slow bus subscriber
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,

    /// Persist committed events to `data_dir/journal`
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_bus_capacity() -> usize {
    1024
}

fn default_journal_enabled() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bus_capacity: default_bus_capacity(),
            journal_enabled: default_journal_enabled(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with process environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up by variable name
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Some(value) = lookup(ENV_BUS_CAPACITY) {
            self.bus_capacity = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_BUS_CAPACITY,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_JOURNAL) {
            self.journal_enabled = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_JOURNAL,
                        value,
                    })
                }
            };
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus_capacity == 0 {
            return Err(ConfigError::Invalid("bus_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Directory holding the JSONL audit journal
    pub fn journal_dir(&self) -> PathBuf {
        self.data_dir.join("journal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.bus_capacity, 1024);
        assert!(config.journal_enabled);
        assert_eq!(config.journal_dir(), PathBuf::from("./data/journal"));
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "bus_capacity": 16 }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.bus_capacity, 16);
        assert_eq!(config.data_dir, PathBuf::from("./data")); // default
        assert!(config.journal_enabled);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lockbox.json");
        std::fs::write(&path, r#"{ "data_dir": "/var/lib/lockbox", "journal_enabled": false }"#)
            .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/lockbox"));
        assert!(!config.journal_enabled);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            AppConfig::from_file(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::write(&path, r#"{ "bus_capacity": 0 }"#).unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .with_overrides(env(&[
                (ENV_DATA_DIR, "/tmp/lockbox"),
                (ENV_BUS_CAPACITY, "64"),
                (ENV_JOURNAL, "off"),
            ]))
            .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/lockbox"));
        assert_eq!(config.bus_capacity, 64);
        assert!(!config.journal_enabled);
    }

    #[test]
    fn test_env_overrides_rejects_garbage() {
        let err = AppConfig::default()
            .with_overrides(env(&[(ENV_BUS_CAPACITY, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_BUS_CAPACITY, .. }));

        let err = AppConfig::default()
            .with_overrides(env(&[(ENV_JOURNAL, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_JOURNAL, .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("bus_capacity"));

        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
