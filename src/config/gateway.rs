//! Payment gateway configuration (YooKassa)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

pub(crate) const SHOP_ID_KEY: &str = "PLANER__GATEWAY__SHOP_ID";
pub(crate) const SECRET_KEY_KEY: &str = "PLANER__GATEWAY__SECRET_KEY";

/// Payment gateway configuration
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// Shop identifier, the basic-auth user name
    #[serde(default)]
    pub shop_id: Option<String>,

    /// Secret API key, the basic-auth password
    #[serde(default)]
    pub secret_key: Option<SecretString>,

    /// Base URL for the gateway API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Where the hosted checkout page sends the buyer afterwards
    #[serde(default = "default_return_url")]
    pub return_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Shop id, if set and not blank.
    pub fn shop_id(&self) -> Option<&str> {
        self.shop_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Secret key, if set and not blank.
    pub fn secret_key(&self) -> Option<&SecretString> {
        self.secret_key
            .as_ref()
            .filter(|s| !s.expose_secret().trim().is_empty())
    }

    /// Whether both halves of the credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.shop_id().is_some() && self.secret_key().is_some()
    }

    /// Names of the credential keys that are absent or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.shop_id().is_none() {
            missing.push(SHOP_ID_KEY);
        }
        if self.secret_key().is_none() {
            missing.push(SECRET_KEY_KEY);
        }
        missing
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(ValidationError::InvalidGatewayUrl(self.api_base_url.clone()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            shop_id: None,
            secret_key: None,
            api_base_url: default_api_base_url(),
            return_url: default_return_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.yookassa.ru".to_string()
}

fn default_return_url() -> String {
    "https://tvoy-planer.vercel.app/?paid=1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
