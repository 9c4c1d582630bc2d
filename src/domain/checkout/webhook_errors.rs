//! Webhook outcome and error types for payment notifications.
//!
//! Soft outcomes are acknowledged with 200 so the gateway stops delivering.
//! Errors answer 500 so the gateway retries the delivery later.

use axum::http::StatusCode;
use thiserror::Error;

/// Terminal states of a webhook delivery that are acknowledged with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Unparseable body or an event other than `payment.succeeded`.
    Ignored { event: Option<String> },

    /// The notification carried no usable payment id.
    NoPaymentId,

    /// The gateway does not confirm the payment as succeeded and paid.
    NotPaid { payment_id: String, status: String },

    /// Verified payment has no usable buyer email in its metadata.
    NoBuyerEmail { payment_id: String },

    /// No link in metadata and no default link configured.
    NoFulfillmentLink { payment_id: String },

    /// The link was emailed to the buyer.
    Fulfilled {
        payment_id: String,
        recipient: String,
    },
}

impl WebhookOutcome {
    /// Plain-text body returned to the gateway.
    pub fn response_text(&self) -> &'static str {
        match self {
            WebhookOutcome::Ignored { .. } => "Ignored",
            WebhookOutcome::NoPaymentId => "No payment id",
            WebhookOutcome::NotPaid { .. } => "Not paid",
            WebhookOutcome::NoBuyerEmail { .. } => "No buyer email in metadata",
            WebhookOutcome::NoFulfillmentLink { .. } => "No planer link",
            WebhookOutcome::Fulfilled { .. } => "OK",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, WebhookOutcome::Fulfilled { .. })
    }
}

/// Errors that occur during webhook processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// Gateway credentials are not configured.
    #[error("Server misconfigured: missing {}", .0.join(", "))]
    Configuration(Vec<&'static str>),

    /// The payment could not be re-fetched from the gateway.
    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    /// The fulfillment email could not be sent.
    #[error("Email delivery failed: {0}")]
    DeliveryFailed(String),
}

impl WebhookError {
    /// Returns true if the gateway should retry delivering this webhook.
    ///
    /// Every error here is transient from the gateway's point of view:
    /// configuration gets fixed, the API comes back, the relay recovers.
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// Status codes determine the gateway's retry behavior:
    /// - 2xx: acknowledged, no retry
    /// - 5xx: will retry
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
