//! Checkout handlers.
//!
//! ## Commands
//! - Creating a payment for the configured product
//! - Processing gateway payment notifications (verify, then deliver the link)
//! - Sending a diagnostic email

mod create_payment;
mod handle_payment_webhook;
mod send_test_email;

pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult};
pub use handle_payment_webhook::{HandlePaymentWebhookCommand, HandlePaymentWebhookHandler};
pub use send_test_email::{SendTestEmailCommand, SendTestEmailHandler, SendTestEmailResult};
