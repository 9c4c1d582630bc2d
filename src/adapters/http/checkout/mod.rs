//! HTTP adapter for checkout endpoints.
//!
//! Exposes the checkout flow via REST API:
//! - `POST /create-payment` - Start a checkout for the configured product
//! - `POST /payment-webhook` - Handle gateway payment notifications
//! - `POST /test-email` - Diagnostic mail (feature-gated)
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CheckoutApiError, CheckoutAppState};
pub use routes::{checkout_router, checkout_routes};
