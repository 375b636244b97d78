// storage-gateway/src/config.rs

use serde::{Deserialize, Serialize};
use shared::observability::{LogConfig, LogFormat, LogLevel};
use std::env;
use std::path::PathBuf;

/// Application configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store root; relative paths are resolved against the working directory.
    pub root: PathBuf,
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST", defaults.server.host),
                port: var("SERVER_PORT", defaults.server.port.to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort)?,
            },
            storage: StorageConfig {
                root: lookup("STORAGE_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.root),
                max_upload_size_mb: var(
                    "MAX_UPLOAD_SIZE_MB",
                    defaults.storage.max_upload_size_mb.to_string(),
                )
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidConfig("MAX_UPLOAD_SIZE_MB must be an integer".to_string())
                })?,
            },
            logging: LoggingConfig {
                level: match lookup("LOG_LEVEL") {
                    Some(raw) => raw
                        .parse()
                        .map_err(|e| ConfigError::InvalidConfig(format!("LOG_LEVEL: {}", e)))?,
                    None => defaults.logging.level,
                },
                format: match lookup("LOG_FORMAT") {
                    Some(raw) => raw
                        .parse()
                        .map_err(|e| ConfigError::InvalidConfig(format!("LOG_FORMAT: {}", e)))?,
                    None => defaults.logging.format,
                },
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("Server host must not be empty".to_string()));
        }

        if self.storage.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig("Storage root must not be empty".to_string()));
        }

        if self.storage.max_upload_size_mb == 0 {
            return Err(ConfigError::InvalidConfig("Max upload size must be > 0".to_string()));
        }

        Ok(())
    }

    /// Request body limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.logging.level,
            format: self.logging.format,
            service_name: env!("CARGO_PKG_NAME").to_string(),
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                root: PathBuf::from("uploads"),
                max_upload_size_mb: 100,
            },
            logging: LoggingConfig {
                level: LogLevel::Info,
                format: LogFormat::Pretty,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.root, PathBuf::from("uploads"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.max_upload_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("STORAGE_ROOT", "/srv/files"),
            ("MAX_UPLOAD_SIZE_MB", "5"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.root, PathBuf::from("/srv/files"));
        assert_eq!(config.max_upload_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[("SERVER_PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort)));

        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn test_invalid_log_format() {
        let result = Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;
        assert!(config.validate().is_err());
    }
}
