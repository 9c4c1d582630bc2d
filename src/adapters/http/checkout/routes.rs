//! Axum router configuration for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{FeatureFlags, ServerConfig};

use super::handlers::{
    create_payment, create_payment_method_not_allowed, handle_payment_webhook, health,
    send_test_email, test_email_method_not_allowed, webhook_method_not_allowed, CheckoutAppState,
};

/// Create the checkout API routes.
///
/// # Routes
/// - `POST /create-payment` - Create a gateway payment, answer with its checkout URL
/// - `POST /payment-webhook` - Gateway notifications (plain-text answers)
/// - `POST /test-email` - Diagnostic mail, only with `features.test_email_enabled`
/// - `GET /health` - Liveness probe
///
/// Other methods on the POST routes get a 405 in the endpoint's own format.
pub fn checkout_routes(features: &FeatureFlags) -> Router<CheckoutAppState> {
    let router = Router::new()
        .route(
            "/create-payment",
            post(create_payment).fallback(create_payment_method_not_allowed),
        )
        .route(
            "/payment-webhook",
            post(handle_payment_webhook).fallback(webhook_method_not_allowed),
        )
        .route("/health", get(health));

    if features.test_email_enabled {
        router.route(
            "/test-email",
            post(send_test_email).fallback(test_email_method_not_allowed),
        )
    } else {
        router
    }
}

/// Create the complete application router with its middleware stack.
///
/// ```ignore
/// let state = CheckoutAppState::new(config, gateway, mailer);
/// let app = checkout_router(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn checkout_router(state: CheckoutAppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let timeout = TimeoutLayer::new(state.config.server.request_timeout());

    checkout_routes(&state.config.features)
        .with_state(state)
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Browser access for the landing page: `POST` and preflight with `Content-Type`.
///
/// Origins that fail to parse as header values are skipped with a warning.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
