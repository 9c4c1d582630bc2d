//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Every required key that is absent or blank, by environment variable name.
    #[error("Required configuration missing: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid payment gateway URL: {0}")]
    InvalidGatewayUrl(String),

    #[error("Invalid product price: {0}")]
    InvalidPrice(String),

    #[error("Invalid from email address")]
    InvalidFromEmail,
}
