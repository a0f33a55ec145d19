use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parse diagnostics shown to the host before the rest are dropped.
    pub max_errors: usize,
    /// How long a forced yield hands control back to the host.
    pub yield_pause_ms: u64,
    /// `tracing` filter directive used when `EVY_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_errors: 8,
            yield_pause_ms: 1,
            log_filter: String::from("info"),
        }
    }
}

impl Config {
    /// Reads the config file if there is one, then applies `EVY_*`
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::get_config_path();
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Config::default()
        };
        config.with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(io_err)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = env::var("EVY_MAX_ERRORS") {
            self.max_errors = value.trim().parse().map_err(|_| ConfigError::Env {
                name: "EVY_MAX_ERRORS",
                value,
            })?;
        }
        if let Ok(value) = env::var("EVY_YIELD_PAUSE_MS") {
            self.yield_pause_ms = value.trim().parse().map_err(|_| ConfigError::Env {
                name: "EVY_YIELD_PAUSE_MS",
                value,
            })?;
        }
        if let Ok(value) = env::var("EVY_LOG") {
            self.log_filter = value;
        }
        Ok(self)
    }

    pub fn yield_pause(&self) -> Duration {
        Duration::from_millis(self.yield_pause_ms)
    }

    pub fn get_config_path() -> PathBuf {
        if let Ok(path) = env::var("EVY_CONFIG") {
            return PathBuf::from(path);
        }
        let home = if cfg!(windows) {
            env::var("USERPROFILE")
        } else {
            env::var("HOME")
        };
        PathBuf::from(home.unwrap_or_else(|_| String::from(".")))
            .join(".evy")
            .join("config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("evy-config-{}-{}", name, std::process::id()))
            .join("config.json")
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_errors": 3}"#).unwrap();
        assert_eq!(config.max_errors, 3);
        assert_eq!(config.yield_pause_ms, 1);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.yield_pause(), Duration::from_millis(1));
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let config = Config {
            max_errors: 20,
            yield_pause_ms: 5,
            log_filter: String::from("evy=debug"),
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_json_names_the_file() {
        let path = temp_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load_from(&temp_path("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
