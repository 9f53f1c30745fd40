//! services/api/src/config.rs
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
    /// Lifetime of a login session. Short by design; defaults to one hour.
    pub session_ttl_secs: i64,
    /// Path to the JSON file holding the linear form-classifier parameters.
    pub form_model_path: PathBuf,
    /// Directory where uploaded snapshots are stored.
    pub media_dir: PathBuf,
    /// Origin allowed by CORS (the browser frontend).
    pub frontend_origin: String,
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
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session Lifetime ---
        let session_ttl_str =
            std::env::var("SESSION_TTL_SECONDS").unwrap_or_else(|_| "3600".to_string());
        let session_ttl_secs = session_ttl_str.parse::<i64>().map_err(|e| {
            ConfigError::InvalidValue("SESSION_TTL_SECONDS".to_string(), e.to_string())
        })?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECONDS".to_string(),
                "must be a positive number of seconds".to_string(),
            ));
        }

        // --- Paths and Frontend Settings ---
        let form_model_path = std::env::var("FORM_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./models/form_svm.json"));

        let media_dir = std::env::var("MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./media"));

        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            session_ttl_secs,
            form_model_path,
            media_dir,
            frontend_origin,
        })
    }
}
