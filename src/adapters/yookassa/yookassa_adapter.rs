//! YooKassa payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the YooKassa REST API v3.
//!
//! # Security
//!
//! - HTTP basic auth with `shop_id:secret_key` on every call
//! - Secrets handled via `secrecy::SecretString`
//! - Payment ids are percent-encoded as a single path segment
//!
//! # Configuration
//!
//! ```ignore
//! let config = YooKassaConfig::new("123456", "live_secret");
//! let adapter = YooKassaPaymentGateway::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::config::GatewayConfig;
use crate::domain::checkout::PaymentStatus;
use crate::ports::{
    CreatePaymentRequest, CreatedPayment, GatewayError, GatewayErrorCode, GatewayPayment,
    PaymentGateway,
};

use super::api_types::{
    AmountBody, ApiErrorBody, ConfirmationRequest, CreatePaymentBody, YooKassaPayment,
};

const IDEMPOTENCE_KEY_HEADER: &str = "Idempotence-Key";

/// YooKassa API configuration.
pub struct YooKassaConfig {
    /// Shop identifier (basic-auth user).
    shop_id: String,

    /// Secret key (basic-auth password).
    secret_key: SecretString,

    /// Base URL for the API (default: https://api.yookassa.ru).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl YooKassaConfig {
    /// Create a new configuration with production defaults.
    pub fn new(shop_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.yookassa.ru".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from application configuration.
    ///
    /// Returns `None` when either credential is absent.
    pub fn from_gateway_config(config: &GatewayConfig) -> Option<Self> {
        let shop_id = config.shop_id()?;
        let secret_key = config.secret_key()?;
        Some(Self {
            shop_id: shop_id.to_string(),
            secret_key: SecretString::new(secret_key.expose_secret().clone()),
            api_base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// YooKassa payment gateway adapter.
pub struct YooKassaPaymentGateway {
    config: YooKassaConfig,
    payments_url: Url,
    http_client: reqwest::Client,
}

impl YooKassaPaymentGateway {
    /// Create a new adapter with the given configuration.
    pub fn new(config: YooKassaConfig) -> Result<Self, GatewayError> {
        let base = config.api_base_url.trim_end_matches('/');
        let payments_url = Url::parse(&format!("{}/v3/payments", base)).map_err(|e| {
            GatewayError::new(
                GatewayErrorCode::Unknown,
                format!("Invalid gateway base URL {}: {}", config.api_base_url, e),
            )
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            payments_url,
            http_client,
        })
    }

    /// `{base}/v3/payments/{id}` with the id encoded as one path segment.
    ///
    /// Dot segments are refused: `url` would drop them and address the
    /// payment list instead.
    fn payment_url(&self, payment_id: &str) -> Result<Url, GatewayError> {
        if payment_id.is_empty() || payment_id == "." || payment_id == ".." {
            return Err(GatewayError::not_found(&format!("Payment {:?}", payment_id)));
        }
        let mut url = self.payments_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::new(GatewayErrorCode::Unknown, "Gateway base URL cannot have a path"))?
            .push(payment_id);
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.config.shop_id, Some(self.config.secret_key.expose_secret()))
    }

    /// Parse a 2xx payment body or turn the response into a `GatewayError`.
    async fn read_payment(response: Response, operation: &str) -> Result<YooKassaPayment, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response, operation).await);
        }

        response.json().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Unexpected YooKassa response shape");
            GatewayError::invalid_response(format!("Failed to parse YooKassa response: {}", e))
        })
    }

    async fn error_from_response(response: Response, operation: &str) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str::<serde_json::Value>(&body).ok();
        let description = details
            .as_ref()
            .and_then(|value| serde_json::from_value::<ApiErrorBody>(value.clone()).ok())
            .and_then(|error| error.description.or(error.code));

        tracing::error!(
            operation,
            status = status.as_u16(),
            error = %body,
            "YooKassa request failed"
        );

        let message = match description {
            Some(description) => format!("YooKassa API error ({}): {}", status.as_u16(), description),
            None => format!("YooKassa API error ({})", status.as_u16()),
        };

        let code = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayErrorCode::AuthenticationError,
            StatusCode::NOT_FOUND => GatewayErrorCode::NotFound,
            StatusCode::TOO_MANY_REQUESTS => GatewayErrorCode::RateLimitExceeded,
            _ => GatewayErrorCode::ProviderError,
        };

        let mut error = GatewayError::new(code, message);
        if status.is_server_error() {
            error.retryable = true;
        }
        match details {
            Some(details) => error.with_details(details),
            None => error,
        }
    }

    fn transport_error(error: reqwest::Error, operation: &str) -> GatewayError {
        tracing::error!(operation, error = %error, "YooKassa transport failure");
        if error.is_timeout() {
            GatewayError::timeout(format!("YooKassa request timed out: {}", error))
        } else {
            GatewayError::network(error.to_string())
        }
    }
}

#[async_trait]
impl PaymentGateway for YooKassaPaymentGateway {
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CreatedPayment, GatewayError> {
        let value = request.amount.value_string();
        let body = CreatePaymentBody {
            amount: AmountBody {
                value: &value,
                currency: request.amount.currency(),
            },
            capture: request.capture,
            confirmation: ConfirmationRequest::redirect(&request.return_url),
            description: &request.description,
            metadata: &request.metadata,
        };

        let response = self
            .authorize(self.http_client.post(self.payments_url.clone()))
            .header(IDEMPOTENCE_KEY_HEADER, request.idempotence_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, "create_payment"))?;

        let payment = Self::read_payment(response, "create_payment").await?;

        tracing::info!(
            payment_id = %payment.id,
            status = %payment.status,
            idempotence_key = %request.idempotence_key,
            "YooKassa payment created"
        );

        Ok(CreatedPayment {
            confirmation_url: payment.confirmation_url().map(str::to_string),
            status: PaymentStatus::from_gateway(&payment.status),
            id: payment.id,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
        let url = self.payment_url(payment_id)?;

        let response = self
            .authorize(self.http_client.get(url))
            .send()
            .await
            .map_err(|e| Self::transport_error(e, "get_payment"))?;

        let payment = Self::read_payment(response, "get_payment").await?;

        Ok(GatewayPayment {
            metadata: payment.string_metadata(),
            status: PaymentStatus::from_gateway(&payment.status),
            paid: payment.paid,
            id: payment.id,
        })
    }
}
