//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CORE_FRAMEWORK_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use core_framework::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sessions stored under {}", config.storage.data_dir.display());
//! ```

mod error;
mod logging;
mod remote;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use remote::RemoteConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a valid
/// local-only configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Local device storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote backend (PostgreSQL); disabled without a database URL
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CORE_FRAMEWORK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CORE_FRAMEWORK__REMOTE__TIMEOUT_MS=2500` -> `remote.timeout_ms = 2500`
    /// - `CORE_FRAMEWORK__STORAGE__DATA_DIR=/var/lib/core` -> `storage.data_dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CORE_FRAMEWORK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.remote.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
