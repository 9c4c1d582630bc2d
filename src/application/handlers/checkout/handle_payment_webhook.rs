//! HandlePaymentWebhookHandler - Command handler for gateway payment notifications.
//!
//! The notification body is only a trigger. The payment it names is re-fetched
//! from the gateway and every fulfillment decision uses the re-fetched record.
//! Soft outcomes answer 200 so the gateway stops; errors answer 500 so it
//! retries the whole delivery later.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::checkout::{
    metadata_keys, BuyerEmail, EmailContent, PaymentNotification, WebhookError, WebhookOutcome,
};
use crate::ports::{EmailMessage, Mailer, PaymentGateway};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
}

/// Handler for processing payment notifications.
///
/// Duplicate deliveries are not deduplicated: each verified delivery sends
/// one email.
pub struct HandlePaymentWebhookHandler {
    config: Arc<AppConfig>,
    payment_gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        config: Arc<AppConfig>,
        payment_gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            payment_gateway,
            mailer,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Credentials are required to verify anything
        if !self.config.gateway.has_credentials() {
            let missing = self.config.gateway.missing_keys();
            tracing::error!(missing = ?missing, "Webhook refused: gateway credentials missing");
            return Err(WebhookError::Configuration(missing));
        }

        // 2. Filter on the event name
        let notification = match PaymentNotification::parse(&cmd.payload) {
            Some(notification) => notification,
            None => {
                tracing::info!(bytes = cmd.payload.len(), "Webhook ignored: unparseable body");
                return Ok(WebhookOutcome::Ignored { event: None });
            }
        };

        if !notification.is_payment_succeeded() {
            tracing::info!(event = ?notification.event(), "Webhook ignored: not a success event");
            return Ok(WebhookOutcome::Ignored {
                event: notification.event().map(str::to_string),
            });
        }

        // 3. The payment id is only a lookup key
        let payment_id = match notification.payment_id() {
            Some(id) => id.to_string(),
            None => {
                tracing::warn!("Webhook without payment id");
                return Ok(WebhookOutcome::NoPaymentId);
            }
        };

        // 4. Re-verify at the gateway
        let payment = self
            .payment_gateway
            .get_payment(&payment_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    payment_id = %payment_id,
                    error = %e,
                    retryable = e.retryable,
                    "Payment verification failed"
                );
                WebhookError::VerificationFailed(e.to_string())
            })?;

        if payment.id != payment_id {
            tracing::error!(
                payment_id = %payment_id,
                returned_id = %payment.id,
                "Gateway returned a different payment"
            );
            return Err(WebhookError::VerificationFailed(format!(
                "gateway returned payment {} for {}",
                payment.id, payment_id
            )));
        }

        // 5. Both the status and the paid flag must confirm
        if !payment.is_confirmed_paid() {
            tracing::info!(
                payment_id = %payment_id,
                status = %payment.status,
                paid = payment.paid,
                "Webhook acknowledged: payment not paid"
            );
            return Ok(WebhookOutcome::NotPaid {
                payment_id,
                status: payment.status.to_string(),
            });
        }

        // 6. Fulfillment data comes from the verified record only
        let email = match payment
            .metadata_value(metadata_keys::BUYER_EMAIL)
            .and_then(|raw| BuyerEmail::parse(raw).ok())
        {
            Some(email) => email,
            None => {
                tracing::warn!(payment_id = %payment_id, "Paid payment has no buyer email");
                return Ok(WebhookOutcome::NoBuyerEmail { payment_id });
            }
        };

        let link = payment
            .metadata_value(metadata_keys::FULFILLMENT_LINK)
            .or_else(|| payment.metadata_value(metadata_keys::LEGACY_FULFILLMENT_LINK))
            .or_else(|| self.config.product.fulfillment_link());
        let link = match link {
            Some(link) => link,
            None => {
                tracing::warn!(payment_id = %payment_id, "Paid payment has no fulfillment link");
                return Ok(WebhookOutcome::NoFulfillmentLink { payment_id });
            }
        };

        // 7. Deliver exactly once per verified delivery
        let content = EmailContent::fulfillment(self.config.email.subject.clone(), link);
        let receipt = self
            .mailer
            .send(EmailMessage::new(email.clone(), content))
            .await
            .map_err(|e| {
                tracing::error!(
                    payment_id = %payment_id,
                    recipient = %email,
                    error = %e,
                    "Fulfillment email failed"
                );
                WebhookError::DeliveryFailed(e.to_string())
            })?;

        tracing::info!(
            payment_id = %payment_id,
            recipient = %email,
            message_id = ?receipt.message_id,
            "Payment fulfilled"
        );

        Ok(WebhookOutcome::Fulfilled {
            payment_id,
            recipient: email.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use serde_json::json;

    use crate::adapters::email::MockMailer;
    use crate::adapters::yookassa::MockPaymentGateway;
    use crate::application::handlers::checkout::test_support::configured_app_config;
    use crate::domain::checkout::PaymentStatus;
    use crate::ports::{GatewayError, GatewayPayment};

    struct Harness {
        gateway: MockPaymentGateway,
        mailer: MockMailer,
        handler: HandlePaymentWebhookHandler,
    }

    fn harness_with(config: AppConfig) -> Harness {
        let gateway = MockPaymentGateway::new();
        let mailer = MockMailer::new();
        let handler = HandlePaymentWebhookHandler::new(
            Arc::new(config),
            Arc::new(gateway.clone()),
            Arc::new(mailer.clone()),
        );
        Harness {
            gateway,
            mailer,
            handler,
        }
    }

    fn harness() -> Harness {
        harness_with(configured_app_config())
    }

    fn succeeded_event(payment_id: &str) -> HandlePaymentWebhookCommand {
        payload(json!({
            "type": "notification",
            "event": "payment.succeeded",
            "object": { "id": payment_id, "status": "succeeded", "paid": true }
        }))
    }

    fn payload(value: serde_json::Value) -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: serde_json::to_vec(&value).unwrap(),
        }
    }

    fn payment(
        id: &str,
        status: PaymentStatus,
        paid: bool,
        metadata: &[(&str, &str)],
    ) -> GatewayPayment {
        GatewayPayment {
            id: id.to_string(),
            status,
            paid,
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Fulfillment
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verified_success_sends_exactly_one_email() {
        let h = harness();
        h.gateway.add_payment(MockPaymentGateway::succeeded_payment(
            "pay_1",
            "buyer@example.com",
            Some("https://x/"),
        ));

        let outcome = h.handler.handle(succeeded_event("pay_1")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Fulfilled {
                payment_id: "pay_1".to_string(),
                recipient: "buyer@example.com".to_string(),
            }
        );
        assert_eq!(outcome.response_text(), "OK");

        let sent = h.mailer.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "buyer@example.com");
        assert_eq!(sent[0].content.subject, "Ваша ссылка на Planer ✅");
        assert!(sent[0].content.html_body.contains("https://x/"));
        assert!(sent[0].content.text_body.contains("https://x/"));
    }

    #[tokio::test]
    async fn forged_webhook_metadata_is_never_used() {
        let h = harness();
        h.gateway.add_payment(MockPaymentGateway::succeeded_payment(
            "pay_1",
            "buyer@example.com",
            Some("https://real.link/"),
        ));

        let forged = payload(json!({
            "event": "payment.succeeded",
            "object": {
                "id": "pay_1",
                "status": "succeeded",
                "paid": true,
                "metadata": {
                    "buyer_email": "attacker@evil.test",
                    "fulfillment_link": "https://evil.test/",
                    "planer_link": "https://evil.test/"
                }
            }
        }));

        h.handler.handle(forged).await.unwrap();

        let sent = h.mailer.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "buyer@example.com");
        assert!(sent[0].content.html_body.contains("https://real.link/"));
        assert!(!sent[0].content.html_body.contains("evil"));
    }

    #[tokio::test]
    async fn forged_paid_flag_does_not_bypass_verification() {
        let h = harness();
        h.gateway.add_payment(payment(
            "pay_1",
            PaymentStatus::Pending,
            false,
            &[("buyer_email", "buyer@example.com")],
        ));

        let outcome = h.handler.handle(succeeded_event("pay_1")).await.unwrap();

        assert_eq!(outcome.response_text(), "Not paid");
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn duplicate_delivery_sends_two_emails() {
        let h = harness();
        h.gateway.add_payment(MockPaymentGateway::succeeded_payment(
            "pay_1",
            "buyer@example.com",
            Some("https://x/"),
        ));

        h.handler.handle(succeeded_event("pay_1")).await.unwrap();
        h.handler.handle(succeeded_event("pay_1")).await.unwrap();

        assert_eq!(h.mailer.sent_count(), 2);
        assert_eq!(h.gateway.call_count("get_payment"), 2);
    }

    #[tokio::test]
    async fn link_falls_back_to_legacy_key_then_configuration() {
        let h = harness();
        h.gateway.add_payment(payment(
            "legacy",
            PaymentStatus::Succeeded,
            true,
            &[("buyer_email", "a@b.c"), ("planer_link", "https://legacy/")],
        ));
        h.gateway.add_payment(payment(
            "bare",
            PaymentStatus::Succeeded,
            true,
            &[("buyer_email", "a@b.c")],
        ));

        h.handler.handle(succeeded_event("legacy")).await.unwrap();
        h.handler.handle(succeeded_event("bare")).await.unwrap();

        let sent = h.mailer.sent_messages();
        assert!(sent[0].content.text_body.contains("https://legacy/"));
        assert!(sent[1]
            .content
            .text_body
            .contains("https://planer-eight.vercel.app/"));
    }

    // ══════════════════════════════════════════════════════════════
    // Soft outcomes
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn non_success_events_are_ignored_without_verification() {
        let h = harness();
        for event in ["payment.waiting_for_capture", "payment.canceled", "refund.succeeded"] {
            let outcome = h
                .handler
                .handle(payload(json!({ "event": event, "object": { "id": "pay_1" } })))
                .await
                .unwrap();
            assert_eq!(
                outcome,
                WebhookOutcome::Ignored {
                    event: Some(event.to_string())
                }
            );
        }
        assert!(!h.gateway.was_called("get_payment"));
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_ignored() {
        let h = harness();
        let outcome = h
            .handler
            .handle(HandlePaymentWebhookCommand {
                payload: b"definitely not json".to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, WebhookOutcome::Ignored { event: None });
        assert!(!h.gateway.was_called("get_payment"));
    }

    #[tokio::test]
    async fn missing_or_blank_payment_id_is_acknowledged() {
        let h = harness();
        let no_object = h
            .handler
            .handle(payload(json!({ "event": "payment.succeeded" })))
            .await
            .unwrap();
        let blank = h
            .handler
            .handle(payload(json!({ "event": "payment.succeeded", "object": { "id": "" } })))
            .await
            .unwrap();

        assert_eq!(no_object, WebhookOutcome::NoPaymentId);
        assert_eq!(blank.response_text(), "No payment id");
        assert!(!h.gateway.was_called("get_payment"));
    }

    #[tokio::test]
    async fn dot_segment_payment_id_is_acknowledged_without_lookup() {
        let h = harness();
        for id in [".", ".."] {
            let outcome = h
                .handler
                .handle(payload(json!({ "event": "payment.succeeded", "object": { "id": id } })))
                .await
                .unwrap();
            assert_eq!(outcome, WebhookOutcome::NoPaymentId);
        }
        assert!(!h.gateway.was_called("get_payment"));
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn succeeded_but_unpaid_is_not_paid() {
        let h = harness();
        h.gateway.add_payment(payment(
            "pay_1",
            PaymentStatus::Succeeded,
            false,
            &[("buyer_email", "buyer@example.com")],
        ));

        let outcome = h.handler.handle(succeeded_event("pay_1")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::NotPaid {
                payment_id: "pay_1".to_string(),
                status: "succeeded".to_string(),
            }
        );
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn missing_or_malformed_buyer_email_is_acknowledged() {
        let h = harness();
        h.gateway.add_payment(payment("none", PaymentStatus::Succeeded, true, &[]));
        h.gateway.add_payment(payment(
            "bad",
            PaymentStatus::Succeeded,
            true,
            &[("buyer_email", "not-an-email")],
        ));

        for id in ["none", "bad"] {
            let outcome = h.handler.handle(succeeded_event(id)).await.unwrap();
            assert_eq!(outcome.response_text(), "No buyer email in metadata");
        }
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn no_link_anywhere_is_acknowledged() {
        let mut config = configured_app_config();
        config.product.fulfillment_link = None;
        let h = harness_with(config);
        h.gateway.add_payment(MockPaymentGateway::succeeded_payment(
            "pay_1",
            "buyer@example.com",
            None,
        ));

        let outcome = h.handler.handle(succeeded_event("pay_1")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::NoFulfillmentLink {
                payment_id: "pay_1".to_string()
            }
        );
        assert_eq!(outcome.response_text(), "No planer link");
        assert_eq!(h.mailer.attempts(), 0);
    }

    // ══════════════════════════════════════════════════════════════
    // Retry-inducing errors
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_credentials_is_configuration_error() {
        let h = harness_with(AppConfig::default());

        let err = h.handler.handle(succeeded_event("pay_1")).await.unwrap_err();

        assert_eq!(
            err,
            WebhookError::Configuration(vec![
                "PLANER__GATEWAY__SHOP_ID",
                "PLANER__GATEWAY__SECRET_KEY"
            ])
        );
        assert!(!h.gateway.was_called("get_payment"));
    }

    #[tokio::test]
    async fn verification_failure_is_retryable_error() {
        let h = harness();
        h.gateway
            .set_method_error("get_payment", GatewayError::network("connection refused"));

        let err = h.handler.handle(succeeded_event("pay_1")).await.unwrap_err();

        assert!(matches!(err, WebhookError::VerificationFailed(_)));
        assert!(err.is_retryable());
        assert_eq!(h.mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn unknown_payment_is_verification_failure() {
        let h = harness();
        let err = h.handler.handle(succeeded_event("missing")).await.unwrap_err();
        assert!(matches!(err, WebhookError::VerificationFailed(_)));
    }

    #[tokio::test]
    async fn mismatched_payment_id_is_verification_failure() {
        let mailer = MockMailer::new();
        let handler = HandlePaymentWebhookHandler::new(
            Arc::new(configured_app_config()),
            Arc::new(SwappingGateway),
            Arc::new(mailer.clone()),
        );

        let err = handler.handle(succeeded_event("pay_1")).await.unwrap_err();

        assert!(matches!(err, WebhookError::VerificationFailed(_)));
        assert_eq!(mailer.attempts(), 0);
    }

    #[tokio::test]
    async fn mail_failure_is_retryable_and_retry_delivers() {
        let h = harness();
        h.gateway.add_payment(MockPaymentGateway::succeeded_payment(
            "pay_1",
            "buyer@example.com",
            Some("https://x/"),
        ));
        h.mailer.set_failure(crate::ports::MailError::transport("relay down"));

        let err = h.handler.handle(succeeded_event("pay_1")).await.unwrap_err();
        assert!(matches!(err, WebhookError::DeliveryFailed(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        // the gateway retries once the relay recovers
        h.mailer.recover();
        let outcome = h.handler.handle(succeeded_event("pay_1")).await.unwrap();
        assert!(outcome.is_fulfilled());
        assert_eq!(h.mailer.attempts(), 2);
        assert_eq!(h.mailer.sent_count(), 1);
    }

    /// Gateway that answers every lookup with a different payment.
    struct SwappingGateway;

    #[async_trait::async_trait]
    impl PaymentGateway for SwappingGateway {
        async fn create_payment(
            &self,
            _request: crate::ports::CreatePaymentRequest,
        ) -> Result<crate::ports::CreatedPayment, GatewayError> {
            Err(GatewayError::network("not used"))
        }

        async fn get_payment(&self, _payment_id: &str) -> Result<GatewayPayment, GatewayError> {
            Ok(MockPaymentGateway::succeeded_payment(
                "someone_else",
                "buyer@example.com",
                Some("https://x/"),
            ))
        }
    }
}
