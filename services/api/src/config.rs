//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Fixed delays applied by the simulated backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Latency {
    pub auth: Duration,
    pub create: Duration,
    pub generate: Duration,
    pub export: Duration,
    pub parse: Duration,
}

impl Latency {
    /// No waiting at all. Used by tests.
    pub fn none() -> Self {
        Self {
            auth: Duration::ZERO,
            create: Duration::ZERO,
            generate: Duration::ZERO,
            export: Duration::ZERO,
            parse: Duration::ZERO,
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub storage_path: PathBuf,
    pub demo_email: String,
    pub demo_password: String,
    pub latency: Latency,
    pub export_base_url: String,
    pub seed_demo_documents: bool,
    pub cors_origin: String,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = var("CORS_ORIGIN", "http://localhost:3000");

        // --- Session Persistence and Demo Account ---
        let storage_path = PathBuf::from(var("STORAGE_PATH", "./.docgen/session.json"));
        let demo_email = var("DEMO_EMAIL", "demo@example.com");
        let demo_password = var("DEMO_PASSWORD", "demo");
        if demo_password.is_empty() {
            return Err(ConfigError::InvalidValue(
                "DEMO_PASSWORD".to_string(),
                "must not be empty".to_string(),
            ));
        }

        // --- Simulated Backend Settings ---
        let millis = |key: &str, default: u64| -> Result<Duration, ConfigError> {
            match lookup(key) {
                None => Ok(Duration::from_millis(default)),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
            }
        };
        let latency = Latency {
            auth: millis("AUTH_DELAY_MS", 1000)?,
            create: millis("CREATE_DELAY_MS", 2000)?,
            generate: millis("GENERATE_DELAY_MS", 3000)?,
            export: millis("EXPORT_DELAY_MS", 2000)?,
            parse: millis("PARSE_DELAY_MS", 3000)?,
        };
        let export_base_url = var("EXPORT_BASE_URL", "https://example.com/exports");

        let seed_str = var("SEED_DEMO_DOCUMENTS", "true");
        let seed_demo_documents = match seed_str.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "SEED_DEMO_DOCUMENTS".to_string(),
                    format!("'{}' is not a boolean", seed_str),
                ))
            }
        };

        Ok(Self {
            bind_address,
            log_level,
            storage_path,
            demo_email,
            demo_password,
            latency,
            export_base_url,
            seed_demo_documents,
            cors_origin,
        })
    }
}
