//! Checkout domain module.
//!
//! Value objects and outcomes for selling a single product through a hosted
//! payment page and delivering its link by email once the gateway confirms
//! the payment.
//!
//! # Module Structure
//!
//! - `amount` - Positive decimal amount in one currency
//! - `buyer_email` - Validated buyer address
//! - `payment` - Gateway statuses, metadata keys, idempotence keys
//! - `notification` - Untrusted webhook envelope (event + payment id only)
//! - `email_content` - Fulfillment and diagnostic message bodies
//! - `errors` - Intent path errors
//! - `webhook_errors` - Webhook outcomes and errors

mod amount;
mod buyer_email;
mod email_content;
mod errors;
mod notification;
mod payment;
mod webhook_errors;

pub use amount::{Amount, AmountError};
pub use buyer_email::{BuyerEmail, InvalidEmail};
pub use email_content::{EmailContent, TEST_SUBJECT};
pub use errors::CheckoutError;
pub use notification::PaymentNotification;
pub use payment::{metadata_keys, IdempotenceKey, PaymentStatus, PAYMENT_SUCCEEDED_EVENT};
pub use webhook_errors::{WebhookError, WebhookOutcome};
