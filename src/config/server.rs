//! HTTP listener settings

use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `request_timeout_secs`.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the checkout API listens.
///
/// Missing fields take the values of [`ServerConfig::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,

    /// Whole-request budget enforced by the HTTP layer
    pub request_timeout_secs: u64,

    /// Browser origins allowed to call the API (comma-separated)
    pub cors_origins: Option<String>,
}

/// Deployment environment. Only the log output differs.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Log line format picked from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn log_format(&self) -> LogFormat {
        match self.environment {
            Environment::Development => LogFormat::Pretty,
            Environment::Production => LogFormat::Json,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured origins, trimmed, blanks dropped.
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,planer_checkout=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults_for_missing_fields() {
        let config: ServerConfig =
            serde_json::from_str(r#"{ "port": 3000, "environment": "production" }"#).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let result = serde_json::from_str::<ServerConfig>(r#"{ "environment": "staging" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn development_logs_pretty() {
        assert_eq!(ServerConfig::default().log_format(), LogFormat::Pretty);
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn allowed_origins_drop_blanks() {
        let config = ServerConfig {
            cors_origins: Some(" https://tvoy-planer.vercel.app, ,http://localhost:3000,".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.allowed_origins(),
            vec!["https://tvoy-planer.vercel.app", "http://localhost:3000"]
        );
        assert!(ServerConfig::default().allowed_origins().is_empty());
    }

    #[test]
    fn validation_errors() {
        let zero_port = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(zero_port.validate(), Err(ValidationError::InvalidPort));

        let bad_host = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_host.validate(),
            Err(ValidationError::InvalidBindAddress(_))
        ));

        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }

        assert!(ServerConfig::default().validate().is_ok());
    }
}
