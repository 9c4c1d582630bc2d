//! Planer Checkout - payment and fulfillment service
//!
//! Creates YooKassa payments for a single digital product and, once the
//! gateway confirms a payment, emails the buyer the product link.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
