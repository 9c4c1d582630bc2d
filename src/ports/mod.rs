//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Create and re-fetch payments at the gateway
//! - `Mailer` - Send a single email

mod mailer;
mod payment_gateway;

pub use mailer::{EmailMessage, MailError, MailErrorCode, MailReceipt, Mailer};
pub use payment_gateway::{
    CreatePaymentRequest, CreatedPayment, GatewayError, GatewayErrorCode, GatewayPayment,
    PaymentGateway,
};
