//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

pub(crate) const SMTP_HOST_KEY: &str = "PLANER__EMAIL__SMTP_HOST";
pub(crate) const USERNAME_KEY: &str = "PLANER__EMAIL__USERNAME";
pub(crate) const PASSWORD_KEY: &str = "PLANER__EMAIL__PASSWORD";

/// Email configuration (SMTP)
#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP port; 465 means implicit TLS, anything else STARTTLS
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP user name
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<SecretString>,

    /// From email address, defaults to the SMTP user name
    #[serde(default)]
    pub from_address: Option<String>,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Subject of the fulfillment email
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl EmailConfig {
    pub fn smtp_host(&self) -> Option<&str> {
        non_blank(self.smtp_host.as_deref())
    }

    pub fn username(&self) -> Option<&str> {
        non_blank(self.username.as_deref())
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
    }

    /// Address mail is sent from.
    pub fn sender_address(&self) -> Option<&str> {
        non_blank(self.from_address.as_deref()).or_else(|| self.username())
    }

    /// Whether the relay speaks TLS from the first byte.
    pub fn uses_implicit_tls(&self) -> bool {
        self.smtp_port == 465
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> Option<String> {
        self.sender_address()
            .map(|address| format!("{} <{}>", self.from_name, address))
    }

    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.smtp_host().is_none() {
            missing.push(SMTP_HOST_KEY);
        }
        if self.username().is_none() {
            missing.push(USERNAME_KEY);
        }
        if self.password().is_none() {
            missing.push(PASSWORD_KEY);
        }
        missing
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.smtp_port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        match self.sender_address() {
            Some(address) if address.contains('@') => Ok(()),
            _ => Err(ValidationError::InvalidFromEmail),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
            from_name: default_from_name(),
            subject: default_subject(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Planer".to_string()
}

fn default_subject() -> String {
    "Ваша ссылка на Planer ✅".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EmailConfig {
        EmailConfig {
            smtp_host: Some("smtp.reg.ru".to_string()),
            username: Some("hello@planer.ru".to_string()),
            password: Some(SecretString::new("pass".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_port, 465);
        assert_eq!(config.from_name, "Planer");
        assert!(config.uses_implicit_tls());
    }

    #[test]
    fn test_from_header_falls_back_to_username() {
        let config = configured();
        assert_eq!(
            config.from_header().as_deref(),
            Some("Planer <hello@planer.ru>")
        );
    }

    #[test]
    fn test_explicit_from_address_wins() {
        let config = EmailConfig {
            from_address: Some("support@planer.ru".to_string()),
            from_name: "Support Team".to_string(),
            ..configured()
        };
        assert_eq!(
            config.from_header().as_deref(),
            Some("Support Team <support@planer.ru>")
        );
    }

    #[test]
    fn test_missing_keys_lists_everything() {
        let config = EmailConfig::default();
        assert_eq!(
            config.missing_keys(),
            vec![SMTP_HOST_KEY, USERNAME_KEY, PASSWORD_KEY]
        );
    }

    #[test]
    fn test_starttls_port() {
        let config = EmailConfig {
            smtp_port: 587,
            ..configured()
        };
        assert!(!config.uses_implicit_tls());
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_address: Some("invalid-email".to_string()),
            ..configured()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(configured().validate().is_ok());
    }
}
