//! Configuration module for the GuardianCare console
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`GUARDIAN_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use guardian::config::ConsoleConfig;
//!
//! let config = ConsoleConfig::default();
//! assert_eq!(config.refresh.interval_seconds, 60);
//!
//! let toml = r#"
//! [backend]
//! url = "http://care-hub.local:5000"
//! "#;
//! let config: ConsoleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.backend.url, "http://care-hub.local:5000");
//! ```

pub mod backend;
pub mod error;
pub mod logging;
pub mod refresh;
pub mod settings;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use refresh::RefreshConfig;
pub use settings::SettingsConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unified configuration for the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend API and push channel
    pub backend: BackendConfig,
    /// Timers and display bounds
    pub refresh: RefreshConfig,
    /// Preference file location
    pub settings: SettingsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (the previous value is kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("GUARDIAN_BACKEND_URL") {
            if !url.is_empty() {
                self.backend.url = url;
            }
        }
        if let Ok(interval) = std::env::var("GUARDIAN_REFRESH_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.refresh.interval_seconds = secs;
            }
        }
        if let Ok(path) = std::env::var("GUARDIAN_SETTINGS_PATH") {
            if !path.is_empty() {
                self.settings.path = PathBuf::from(path);
            }
        }
        if let Ok(level) = std::env::var("GUARDIAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GUARDIAN_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                field: "backend.url".to_string(),
                message: "URL must start with http:// or https://".to_string(),
            });
        }
        if self.backend.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.backend.reconnect_delay_ms == 0 {
            return Err(ConfigError::Validation {
                field: "backend.reconnect_delay_ms".to_string(),
                message: "reconnect delay must be non-zero".to_string(),
            });
        }
        if self.refresh.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "refresh.interval_seconds".to_string(),
                message: "interval must be non-zero".to_string(),
            });
        }
        if self.refresh.feed_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "refresh.feed_capacity".to_string(),
                message: "capacity must be non-zero".to_string(),
            });
        }
        if self.refresh.trend_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "refresh.trend_capacity".to_string(),
                message: "capacity must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_console_config_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.backend.url, "http://127.0.0.1:5000");
        assert_eq!(config.refresh.interval_seconds, 60);
        assert_eq!(config.settings.path, PathBuf::from("guardian-settings.json"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [refresh]
        interval_seconds = 30
        "#;

        let config: ConsoleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.refresh.interval_seconds, 30);
        assert_eq!(config.backend.url, "http://127.0.0.1:5000"); // Default
    }

    #[test]
    fn test_config_parse_example_file() {
        let toml = include_str!("../../guardian.example.toml");
        let config: ConsoleConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[backend]\nurl = \"http://10.0.0.5:5000\"").unwrap();

        let config = ConsoleConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:5000");
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[backend\nurl = ").unwrap();

        let result = ConsoleConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = ConsoleConfig::load(Some(Path::new("/nonexistent/guardian.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = ConsoleConfig::load(None).unwrap();
        assert_eq!(config.refresh.feed_capacity, 10);
    }

    // Env-var tests share one test so they cannot race each other.
    #[test]
    fn test_config_env_overrides() {
        std::env::set_var("GUARDIAN_BACKEND_URL", "http://hub:5000");
        std::env::set_var("GUARDIAN_REFRESH_INTERVAL", "not-a-number");
        std::env::set_var("GUARDIAN_LOG_FORMAT", "json");
        let config = ConsoleConfig::default().with_env_overrides();
        std::env::remove_var("GUARDIAN_BACKEND_URL");
        std::env::remove_var("GUARDIAN_REFRESH_INTERVAL");
        std::env::remove_var("GUARDIAN_LOG_FORMAT");

        assert_eq!(config.backend.url, "http://hub:5000");
        // Invalid value keeps the default
        assert_eq!(config.refresh.interval_seconds, 60);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = ConsoleConfig::default();
        config.backend.url = "  ".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.url"
        ));
    }

    #[test]
    fn test_config_validation_url_scheme() {
        let mut config = ConsoleConfig::default();
        config.backend.url = "ftp://hub".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = ConsoleConfig::default();
        config.refresh.interval_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "refresh.interval_seconds"
        ));
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let mut config = ConsoleConfig::default();
        config.refresh.feed_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = ConsoleConfig::default();
        config.refresh.trend_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_backend_timings() {
        let mut config = ConsoleConfig::default();
        config.backend.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.timeout_seconds"
        ));

        let mut config = ConsoleConfig::default();
        config.backend.reconnect_delay_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.reconnect_delay_ms"
        ));
    }
}
