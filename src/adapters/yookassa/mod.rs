//! YooKassa payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for YooKassa API v3:
//! - Payment creation with redirect confirmation and idempotence keys
//! - Payment lookup used to re-verify webhook notifications
//!
//! # Security
//!
//! - Every call is authenticated with HTTP basic auth (`shop_id:secret_key`)
//! - Notifications are never trusted; payments are always re-fetched
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `PLANER__GATEWAY__SHOP_ID`: YooKassa shop id
//! - `PLANER__GATEWAY__SECRET_KEY`: YooKassa secret key

mod api_types;
mod mock_payment_gateway;
mod yookassa_adapter;

pub use api_types::{ApiErrorBody, YooKassaPayment};
pub use mock_payment_gateway::{MethodCall, MockPaymentGateway};
pub use yookassa_adapter::{YooKassaConfig, YooKassaPaymentGateway};
