//! Payment gateway port for external payment processing.
//!
//! Defines the contract for hosted-checkout gateway integrations (e.g., YooKassa).
//! The gateway is the only source of truth for payment state: nothing is stored
//! locally, and webhook handling re-fetches every payment it acts on.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any redirect-style provider
//! - **Single purchase**: One payment per checkout, captured immediately
//! - **Idempotent**: Creation carries a caller-generated idempotence key

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::{Amount, IdempotenceKey, PaymentStatus};

/// Port for payment gateway integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment and obtain the hosted confirmation page.
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CreatedPayment, GatewayError>;

    /// Fetch the current, authoritative state of a payment.
    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError>;
}

/// Request to create a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentRequest {
    pub amount: Amount,

    /// Human-readable description shown on the payment page.
    pub description: String,

    /// Where the buyer lands after paying.
    pub return_url: String,

    /// Capture immediately instead of holding funds.
    pub capture: bool,

    /// Stored by the gateway and returned on every fetch.
    pub metadata: BTreeMap<String, String>,

    /// Fresh per attempt.
    pub idempotence_key: IdempotenceKey,
}

/// Payment as returned right after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPayment {
    pub id: String,
    pub status: PaymentStatus,

    /// Hosted page the buyer is redirected to.
    pub confirmation_url: Option<String>,
}

/// Payment as re-fetched from the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPayment {
    pub id: String,
    pub status: PaymentStatus,
    pub paid: bool,
    pub metadata: BTreeMap<String, String>,
}

impl GatewayPayment {
    /// Metadata value, ignoring blank entries.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// True only when the gateway reports both a succeeded status and `paid`.
    pub fn is_confirmed_paid(&self) -> bool {
        self.status.is_succeeded() && self.paid
    }
}

/// Payment gateway error.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Gateway response body, when it sent JSON.
    pub details: Option<serde_json::Value>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the gateway's response body.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Timeout, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(GatewayErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Request exceeded the client timeout.
    Timeout,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Gateway answered with a non-success status.
    ProviderError,

    /// Gateway answered 2xx with a body we cannot use.
    InvalidResponse,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError
                | GatewayErrorCode::Timeout
                | GatewayErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::Timeout => "timeout",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::InvalidResponse => "invalid_response",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
