//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum router exposing the checkout API
//! - `yookassa` - YooKassa payment gateway (plus an in-memory mock)
//! - `email` - SMTP mailer (plus an in-memory mock)

pub mod email;
pub mod http;
pub mod yookassa;
