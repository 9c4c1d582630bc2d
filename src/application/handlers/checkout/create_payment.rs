//! CreatePaymentHandler - Command handler for starting a checkout.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::checkout::{metadata_keys, BuyerEmail, CheckoutError, IdempotenceKey};
use crate::ports::{CreatePaymentRequest, GatewayError, PaymentGateway};

/// Command to create a payment for the configured product.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    /// Buyer email exactly as submitted.
    pub email: String,
}

/// Result of a successful payment creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentResult {
    pub payment_id: String,
    pub confirmation_url: String,
}

/// Handler for creating payments.
///
/// Fulfillment data (buyer email, link) is stored as gateway metadata so the
/// webhook can recover it from the verified payment without local storage.
pub struct CreatePaymentHandler {
    config: Arc<AppConfig>,
    payment_gateway: Arc<dyn PaymentGateway>,
}

impl CreatePaymentHandler {
    pub fn new(config: Arc<AppConfig>, payment_gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            config,
            payment_gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentCommand,
    ) -> Result<CreatePaymentResult, CheckoutError> {
        // 1. Validate input before touching configuration or the gateway
        let email = BuyerEmail::parse(&cmd.email).map_err(|_| CheckoutError::invalid_email())?;

        // 2. Credentials and the link must be configured
        let mut missing = self.config.gateway.missing_keys();
        missing.extend(self.config.product.missing_keys());
        if !missing.is_empty() {
            tracing::error!(missing = ?missing, "Payment creation refused: configuration missing");
            return Err(CheckoutError::missing_configuration(&missing));
        }
        let link = self
            .config
            .product
            .fulfillment_link()
            .ok_or_else(|| CheckoutError::configuration("Fulfillment link is not set"))?;

        let amount = self
            .config
            .product
            .amount()
            .map_err(|e| CheckoutError::configuration(format!("Invalid product price: {}", e)))?;

        // 3. Build the request with fulfillment metadata and a fresh key
        let metadata = BTreeMap::from([
            (metadata_keys::BUYER_EMAIL.to_string(), email.as_str().to_string()),
            (metadata_keys::FULFILLMENT_LINK.to_string(), link.to_string()),
            (
                metadata_keys::PRODUCT.to_string(),
                self.config.product.code.clone(),
            ),
        ]);
        let idempotence_key = IdempotenceKey::generate();

        let request = CreatePaymentRequest {
            description: self.config.product.payment_description(&amount),
            amount,
            return_url: self.config.gateway.return_url.clone(),
            capture: true,
            metadata,
            idempotence_key: idempotence_key.clone(),
        };

        // 4. Create at the gateway
        let created = self
            .payment_gateway
            .create_payment(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    idempotence_key = %idempotence_key,
                    error = %e,
                    "Payment creation failed"
                );
                upstream_error(e)
            })?;

        let confirmation_url = created.confirmation_url.ok_or_else(|| {
            tracing::error!(payment_id = %created.id, "Gateway returned no confirmation URL");
            CheckoutError::no_confirmation_url()
        })?;

        tracing::info!(
            payment_id = %created.id,
            status = %created.status,
            "Payment created"
        );

        Ok(CreatePaymentResult {
            payment_id: created.id,
            confirmation_url,
        })
    }
}

/// Gateway failures keep the gateway's own body as details when there is one.
fn upstream_error(error: GatewayError) -> CheckoutError {
    let details = error.details.unwrap_or_else(|| {
        serde_json::json!({
            "code": error.code,
            "message": error.message,
        })
    });
    CheckoutError::upstream("Payment creation failed", Some(details))
}
