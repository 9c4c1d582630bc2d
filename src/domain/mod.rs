//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `checkout` - Payment intent and fulfillment vocabulary

pub mod checkout;
