//! SendTestEmailHandler - Command handler for the diagnostic mail endpoint.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::checkout::{BuyerEmail, CheckoutError, EmailContent};
use crate::ports::{EmailMessage, Mailer};

/// Command to send a diagnostic message.
#[derive(Debug, Clone)]
pub struct SendTestEmailCommand {
    pub to: String,
}

/// Result of a delivered diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTestEmailResult {
    pub message_id: Option<String>,
}

/// Sends a test message through the configured mailer.
pub struct SendTestEmailHandler {
    config: Arc<AppConfig>,
    mailer: Arc<dyn Mailer>,
}

impl SendTestEmailHandler {
    pub fn new(config: Arc<AppConfig>, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    pub async fn handle(
        &self,
        cmd: SendTestEmailCommand,
    ) -> Result<SendTestEmailResult, CheckoutError> {
        let to = BuyerEmail::parse(&cmd.to)
            .map_err(|_| CheckoutError::invalid_input("to", "Valid recipient email is required"))?;

        let content = EmailContent::test_message(self.config.product.fulfillment_link());
        let receipt = self
            .mailer
            .send(EmailMessage::new(to.clone(), content))
            .await
            .map_err(|e| {
                tracing::error!(recipient = %to, error = %e, "Test email failed");
                CheckoutError::delivery("Failed to send email")
            })?;

        tracing::info!(recipient = %to, message_id = ?receipt.message_id, "Test email sent");

        Ok(SendTestEmailResult {
            message_id: receipt.message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::adapters::email::MockMailer;
    use crate::application::handlers::checkout::test_support::configured_app_config;

    fn handler(mailer: &MockMailer) -> SendTestEmailHandler {
        SendTestEmailHandler::new(Arc::new(configured_app_config()), Arc::new(mailer.clone()))
    }

    #[tokio::test]
    async fn sends_test_message_with_configured_link() {
        let mailer = MockMailer::new();
        let result = handler(&mailer)
            .handle(SendTestEmailCommand {
                to: "ops@example.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.message_id.as_deref(), Some("<mock-1@planer.test>"));
        let sent = mailer.sent_messages();
        assert_eq!(sent[0].to.as_str(), "ops@example.com");
        assert!(sent[0].content.html_body.contains("https://planer-eight.vercel.app/"));
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected() {
        let mailer = MockMailer::new();
        let err = handler(&mailer)
            .handle(SendTestEmailCommand { to: "  ".to_string() })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn mail_failure_maps_to_fixed_message() {
        let mailer = MockMailer::failing();
        let err = handler(&mailer)
            .handle(SendTestEmailCommand {
                to: "ops@example.com".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to send email");
    }
}
