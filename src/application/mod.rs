//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, SendTestEmailCommand, SendTestEmailHandler, SendTestEmailResult,
};
