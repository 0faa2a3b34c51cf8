//! services/admin-api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub pool_min_connections: u32,
    pub pool_max_connections: u32,
    pub export_dir: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5001".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Pool Bounds ---
        let pool_min_connections = parse_pool_var("DB_POOL_MIN", 1)?;
        let pool_max_connections = parse_pool_var("DB_POOL_MAX", 4)?;
        if pool_min_connections > pool_max_connections {
            return Err(ConfigError::InvalidValue(
                "DB_POOL_MIN".to_string(),
                format!(
                    "minimum {} exceeds maximum {}",
                    pool_min_connections, pool_max_connections
                ),
            ));
        }

        // --- Load Export Settings ---
        let export_dir = std::env::var("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            pool_min_connections,
            pool_max_connections,
            export_dir,
        })
    }
}

fn parse_pool_var(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_var_defaults_when_unset() {
        assert_eq!(parse_pool_var("DB_POOL_TEST_UNSET", 4).unwrap(), 4);
    }

    #[test]
    fn pool_var_rejects_garbage() {
        std::env::set_var("DB_POOL_TEST_BAD", "many");
        let err = parse_pool_var("DB_POOL_TEST_BAD", 1).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "DB_POOL_TEST_BAD"));
        std::env::remove_var("DB_POOL_TEST_BAD");
    }
}
