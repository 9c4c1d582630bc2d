//! HTTP DTOs for checkout endpoints.
//!
//! These types define the JSON request/response structure of the public API.
//! The webhook speaks plain text and has no DTOs.

use serde::{Deserialize, Serialize};

use crate::application::handlers::checkout::{CreatePaymentResult, SendTestEmailResult};
use crate::domain::checkout::CheckoutError;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a checkout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentRequest {
    /// Buyer email. Missing is treated like empty and rejected by validation.
    #[serde(default)]
    pub email: String,
}

/// Request to send a diagnostic message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestEmailRequest {
    #[serde(default)]
    pub to: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response carrying the hosted checkout page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePaymentResponse {
    pub confirmation_url: String,
    pub payment_id: String,
}

impl From<CreatePaymentResult> for CreatePaymentResponse {
    fn from(result: CreatePaymentResult) -> Self {
        Self {
            confirmation_url: result.confirmation_url,
            payment_id: result.payment_id,
        }
    }
}

/// Response of the diagnostic mail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestEmailResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestEmailResponse {
    pub fn sent(result: SendTestEmailResult) -> Self {
        Self {
            ok: true,
            message_id: result.message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Standard error response for JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Upstream payload or other context (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

impl From<&CheckoutError> for ErrorResponse {
    fn from(err: &CheckoutError) -> Self {
        match err.details() {
            Some(details) => Self::with_details(err.to_string(), details.clone()),
            None => Self::new(err.to_string()),
        }
    }
}
