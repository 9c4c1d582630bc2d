//! Payment vocabulary shared by the intent and webhook paths.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Event name the gateway sends once a payment has been captured.
pub const PAYMENT_SUCCEEDED_EVENT: &str = "payment.succeeded";

/// Keys written into gateway-side payment metadata at creation time.
pub mod metadata_keys {
    pub const BUYER_EMAIL: &str = "buyer_email";
    pub const FULFILLMENT_LINK: &str = "fulfillment_link";
    pub const PRODUCT: &str = "product";

    /// Link key used by payments created before `fulfillment_link`; read only.
    pub const LEGACY_FULFILLMENT_LINK: &str = "planer_link";
}

/// Payment status as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    WaitingForCapture,
    Succeeded,
    Canceled,
    /// Anything the gateway may add later.
    Unknown(String),
}

impl PaymentStatus {
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "pending" => PaymentStatus::Pending,
            "waiting_for_capture" => PaymentStatus::WaitingForCapture,
            "succeeded" => PaymentStatus::Succeeded,
            "canceled" => PaymentStatus::Canceled,
            other => PaymentStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::WaitingForCapture => "waiting_for_capture",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Canceled => "canceled",
            PaymentStatus::Unknown(other) => other,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-use token that lets the gateway collapse retried creation calls.
///
/// A fresh key is generated per creation attempt and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IdempotenceKey(String);

impl IdempotenceKey {
    /// Generates a new random key (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
