//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_AGE_BRACKETS, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_LEADERBOARD_LIMIT,
    DEFAULT_NOTIFICATIONS_ENABLED, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MAX_LEADERBOARD_LIMIT,
};
use crate::timing::brackets::{AgeBracket, parse_age_brackets};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub timing: TimingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Timing engine configuration
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Leaderboard size when the caller gives no limit
    pub leaderboard_default_limit: i64,
    /// Disjoint age brackets used for age-group ranking
    pub age_brackets: Vec<AgeBracket>,
    /// Dispatch finish notifications for valid results
    pub notifications_enabled: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            leaderboard_default_limit: DEFAULT_LEADERBOARD_LIMIT,
            age_brackets: parse_age_brackets(DEFAULT_AGE_BRACKETS)
                .expect("default age brackets are well-formed"),
            notifications_enabled: DEFAULT_NOTIFICATIONS_ENABLED,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            timing: TimingConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: env::var("SERVER_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_REQUEST_TIMEOUT_SECS".to_string()))?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl TimingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let leaderboard_default_limit: i64 = env::var("TIMING_LEADERBOARD_DEFAULT_LIMIT")
            .unwrap_or_else(|_| DEFAULT_LEADERBOARD_LIMIT.to_string())
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue("TIMING_LEADERBOARD_DEFAULT_LIMIT".to_string())
            })?;

        if !(1..=MAX_LEADERBOARD_LIMIT).contains(&leaderboard_default_limit) {
            return Err(ConfigError::InvalidValue(
                "TIMING_LEADERBOARD_DEFAULT_LIMIT".to_string(),
            ));
        }

        let raw_brackets =
            env::var("TIMING_AGE_BRACKETS").unwrap_or_else(|_| DEFAULT_AGE_BRACKETS.to_string());
        let age_brackets = parse_age_brackets(&raw_brackets)
            .map_err(|_| ConfigError::InvalidValue("TIMING_AGE_BRACKETS".to_string()))?;

        Ok(Self {
            leaderboard_default_limit,
            age_brackets,
            notifications_enabled: env::var("TIMING_NOTIFICATIONS_ENABLED")
                .unwrap_or_else(|_| DEFAULT_NOTIFICATIONS_ENABLED.to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("TIMING_NOTIFICATIONS_ENABLED".to_string())
                })?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "info".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_default_timing_config() {
        let timing = TimingConfig::default();
        assert_eq!(timing.leaderboard_default_limit, 10);
        assert_eq!(timing.age_brackets.len(), 4);
        assert_eq!(timing.age_brackets[0], AgeBracket::new(18, Some(30)));
        assert_eq!(timing.age_brackets[3], AgeBracket::new(61, None));
        assert!(timing.notifications_enabled);
    }
}
