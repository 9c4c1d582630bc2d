//! Checkout error types for the payment intent path.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MethodNotAllowed | 405 |
//! | InvalidInput | 400 |
//! | Configuration | 500 |
//! | Upstream | 500 |
//! | Delivery | 500 |

use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced by the checkout handlers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Request input failed validation; `message` is shown to the client.
    #[error("{message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// Required deployment configuration is absent.
    #[error("{message}")]
    Configuration { message: String },

    /// The payment gateway rejected the call or could not be reached.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The mail relay refused or failed the message.
    #[error("{message}")]
    Delivery { message: String },
}

impl CheckoutError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        CheckoutError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_email() -> Self {
        Self::invalid_input("email", "Valid email is required")
    }

    pub fn missing_configuration(keys: &[&str]) -> Self {
        CheckoutError::Configuration {
            message: format!("Required configuration missing: {}", keys.join(", ")),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CheckoutError::Configuration {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        CheckoutError::Upstream {
            message: message.into(),
            details,
        }
    }

    pub fn no_confirmation_url() -> Self {
        Self::upstream("No confirmation_url from payment gateway", None)
    }

    pub fn delivery(message: impl Into<String>) -> Self {
        CheckoutError::Delivery {
            message: message.into(),
        }
    }

    /// Extra context attached to the error envelope, if any.
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            CheckoutError::Upstream { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            CheckoutError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            CheckoutError::Configuration { .. }
            | CheckoutError::Upstream { .. }
            | CheckoutError::Delivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
