//! SMTP mailer backed by `lettre`.
//!
//! Port 465 uses implicit TLS, any other port upgrades with STARTTLS.
//! The transport is built once at startup and pools connections lazily.
//! Construction never touches the network, but the pool spawns its reaper
//! task, so it must run inside a Tokio runtime.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::config::EmailConfig;
use crate::ports::{EmailMessage, MailError, MailReceipt, Mailer};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Mailer delivering through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Right-hand side of generated `Message-ID`s.
    message_id_domain: String,
}

impl SmtpMailer {
    /// Build the transport from configuration.
    ///
    /// Must be called from within a Tokio runtime: the connection pool is
    /// started with `tokio::spawn`.
    pub fn from_config(config: &EmailConfig) -> Result<Self, MailError> {
        let host = config
            .smtp_host()
            .ok_or_else(|| MailError::configuration("SMTP host is not set"))?;
        let username = config
            .username()
            .ok_or_else(|| MailError::configuration("SMTP username is not set"))?;
        let password = config
            .password()
            .ok_or_else(|| MailError::configuration("SMTP password is not set"))?;
        let sender = config
            .sender_address()
            .ok_or_else(|| MailError::configuration("Sender address is not set"))?;

        let address: Address = sender
            .parse()
            .map_err(|e| MailError::invalid_address(format!("Invalid sender {}: {}", sender, e)))?;
        let message_id_domain = address.domain().to_string();
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let builder = if config.uses_implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| MailError::configuration(format!("Invalid SMTP relay {}: {}", host, e)))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                username.to_string(),
                password.expose_secret().clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        tracing::info!(
            host,
            port = config.smtp_port,
            implicit_tls = config.uses_implicit_tls(),
            from = ?config.from_header(),
            "SMTP mailer configured"
        );

        Ok(Self {
            transport,
            from,
            message_id_domain,
        })
    }

    /// Render a message with a fresh `Message-ID`.
    fn build_message(&self, message: &EmailMessage) -> Result<(Message, String), MailError> {
        let to: Mailbox = message.to.as_str().parse().map_err(|e| {
            MailError::invalid_address(format!("Invalid recipient {}: {}", message.to, e))
        })?;
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.message_id_domain);

        let email = Message::builder()
            .message_id(Some(message_id.clone()))
            .from(self.from.clone())
            .to(to)
            .subject(message.content.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.content.text_body.clone(),
                message.content.html_body.clone(),
            ))
            .map_err(|e| MailError::invalid_address(format!("Failed to build message: {}", e)))?;

        Ok((email, message_id))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<MailReceipt, MailError> {
        let (email, message_id) = self.build_message(&message)?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(recipient = %message.to, error = %e, "SMTP delivery failed");
            MailError::transport(e.to_string())
        })?;

        tracing::info!(recipient = %message.to, message_id = %message_id, "Email sent");

        Ok(MailReceipt {
            message_id: Some(message_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::{BuyerEmail, EmailContent};
    use crate::ports::MailErrorCode;
    use secrecy::SecretString;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            username: Some("hello@planer.test".to_string()),
            password: Some(SecretString::new("pass".to_string())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn from_config_requires_host_and_credentials() {
        let err = SmtpMailer::from_config(&EmailConfig::default()).err().unwrap();
        assert_eq!(err.code, MailErrorCode::Configuration);

        let mut no_password = config();
        no_password.password = None;
        let err = SmtpMailer::from_config(&no_password).err().unwrap();
        assert_eq!(err.code, MailErrorCode::Configuration);
    }

    #[tokio::test]
    async fn from_config_rejects_malformed_sender() {
        let mut bad = config();
        bad.from_address = Some("not-an-address".to_string());
        let err = SmtpMailer::from_config(&bad).err().unwrap();
        assert_eq!(err.code, MailErrorCode::InvalidAddress);
    }

    #[tokio::test]
    async fn builds_for_both_tls_modes() {
        assert!(SmtpMailer::from_config(&config()).is_ok());

        let mut starttls = config();
        starttls.smtp_port = 587;
        assert!(SmtpMailer::from_config(&starttls).is_ok());
    }

    #[tokio::test]
    async fn message_carries_generated_id_and_recipient() {
        let mailer = SmtpMailer::from_config(&config()).unwrap();
        let message = EmailMessage::new(
            BuyerEmail::parse("buyer@example.com").unwrap(),
            EmailContent::fulfillment("Subject", "https://x/"),
        );

        let (email, message_id) = mailer.build_message(&message).unwrap();
        assert!(message_id.starts_with('<'));
        assert!(message_id.ends_with("@planer.test>"));

        let formatted = String::from_utf8_lossy(&email.formatted()).to_string();
        assert!(formatted.contains("buyer@example.com"));
        assert!(formatted.contains(&message_id));
        assert!(formatted.contains("hello@planer.test"));
    }

    #[tokio::test]
    async fn message_ids_are_unique() {
        let mailer = SmtpMailer::from_config(&config()).unwrap();
        let message = EmailMessage::new(
            BuyerEmail::parse("buyer@example.com").unwrap(),
            EmailContent::test_message(None),
        );
        let (_, first) = mailer.build_message(&message).unwrap();
        let (_, second) = mailer.build_message(&message).unwrap();
        assert_ne!(first, second);
    }
}
