//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to the checkout command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::checkout::{
    CreatePaymentCommand, CreatePaymentHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, SendTestEmailCommand, SendTestEmailHandler,
};
use crate::config::AppConfig;
use crate::domain::checkout::CheckoutError;
use crate::ports::{Mailer, PaymentGateway};

use super::dto::{
    CreatePaymentRequest, CreatePaymentResponse, ErrorResponse, HealthResponse, TestEmailRequest,
    TestEmailResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; every field is an `Arc`.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub config: Arc<AppConfig>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
}

impl CheckoutAppState {
    pub fn new(
        config: Arc<AppConfig>,
        payment_gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            payment_gateway,
            mailer,
        }
    }

    pub fn create_payment_handler(&self) -> CreatePaymentHandler {
        CreatePaymentHandler::new(self.config.clone(), self.payment_gateway.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.config.clone(),
            self.payment_gateway.clone(),
            self.mailer.clone(),
        )
    }

    pub fn test_email_handler(&self) -> SendTestEmailHandler {
        SendTestEmailHandler::new(self.config.clone(), self.mailer.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-payment - Start a checkout for the configured product
pub async fn create_payment(
    State(state): State<CheckoutAppState>,
    request: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let Json(request) = request.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected create-payment body");
        CheckoutError::invalid_input("body", rejection.body_text())
    })?;

    let handler = state.create_payment_handler();
    let cmd = CreatePaymentCommand {
        email: request.email,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(CreatePaymentResponse::from(result)))
}

/// POST /payment-webhook - Handle gateway payment notifications
///
/// Answers in plain text. Soft outcomes are 200 so the gateway stops
/// retrying; errors are 500 so it tries again later.
pub async fn handle_payment_webhook(
    State(state): State<CheckoutAppState>,
    body: Bytes,
) -> Response {
    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
    };

    match handler.handle(cmd).await {
        Ok(outcome) => (outcome.status_code(), outcome.response_text()).into_response(),
        Err(err) => (err.status_code(), err.to_string()).into_response(),
    }
}

/// POST /test-email - Send a diagnostic message
pub async fn send_test_email(
    State(state): State<CheckoutAppState>,
    request: Result<Json<TestEmailRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(TestEmailResponse::failed(rejection.body_text())),
            )
                .into_response();
        }
    };

    let handler = state.test_email_handler();
    match handler.handle(SendTestEmailCommand { to: request.to }).await {
        Ok(result) => (StatusCode::OK, Json(TestEmailResponse::sent(result))).into_response(),
        Err(err) => (err.status_code(), Json(TestEmailResponse::failed(err.to_string())))
            .into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Method Fallbacks
// ════════════════════════════════════════════════════════════════════════════════

/// Any non-POST method on /create-payment.
pub async fn create_payment_method_not_allowed() -> CheckoutApiError {
    CheckoutApiError(CheckoutError::MethodNotAllowed)
}

/// Any non-POST method on /payment-webhook.
pub async fn webhook_method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Any non-POST method on /test-email.
pub async fn test_email_method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(TestEmailResponse::failed("Method not allowed")),
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for converting checkout errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
