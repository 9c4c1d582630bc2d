//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLANER` prefix and nested values use double underscores as separators.
//!
//! The configuration is loaded once at process start, validated eagerly and
//! shared with every handler behind an `Arc`.
//!
//! # Example
//!
//! ```no_run
//! use planer_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod email;
mod error;
mod features;
mod gateway;
mod product;
mod server;

pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use gateway::GatewayConfig;
pub use product::ProductConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults so that loading succeeds with missing values;
/// [`AppConfig::validate()`] then reports every missing key at once.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment gateway configuration (YooKassa)
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Product being sold and the link delivered for it
    #[serde(default)]
    pub product: ProductConfig,

    /// Email configuration (SMTP)
    #[serde(default)]
    pub email: EmailConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the environment
    ///
    /// Variables already set in the process win over `.env` entries.
    ///
    /// # Environment Variable Format
    ///
    /// - `PLANER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLANER__GATEWAY__SHOP_ID=...` -> `gateway.shop_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from_env()
    }

    /// Load configuration from process environment variables only
    ///
    /// Reads `PLANER`-prefixed variables with `__` separating nested
    /// values. No `.env` file is consulted.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLANER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Missing required keys are collected across every section and
    /// reported together before any semantic check runs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is missing or invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(ValidationError::MissingKeys(missing));
        }

        self.server.validate()?;
        self.gateway.validate()?;
        self.product.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Every required key that is absent or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = self.gateway.missing_keys();
        missing.extend(self.product.missing_keys());
        missing.extend(self.email.missing_keys());
        missing
    }
}
