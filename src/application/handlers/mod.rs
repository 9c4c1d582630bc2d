//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod checkout;

pub use checkout::{
    CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, SendTestEmailCommand, SendTestEmailHandler, SendTestEmailResult,
};
