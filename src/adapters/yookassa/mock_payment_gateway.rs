//! Mock payment gateway for testing.
//!
//! Provides a configurable in-memory implementation of `PaymentGateway` for
//! unit and integration tests. Supports:
//! - Stored payments that behave like the gateway's records
//! - Error injection
//! - Call tracking, including every creation request

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::checkout::{metadata_keys, PaymentStatus};
use crate::ports::{
    CreatePaymentRequest, CreatedPayment, GatewayError, GatewayPayment, PaymentGateway,
};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// let created = gateway.create_payment(request).await?;
///
/// // Simulate the buyer paying on the hosted page
/// gateway.mark_succeeded(&created.id);
///
/// // Inject errors
/// gateway.set_method_error("get_payment", GatewayError::network("down"));
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Payments by id, as the gateway would return them.
    payments: HashMap<String, GatewayPayment>,

    /// Every accepted creation request, in order.
    created: Vec<CreatePaymentRequest>,

    /// Answer creations without a confirmation URL.
    omit_confirmation_url: bool,

    /// Error to return on next call.
    next_error: Option<GatewayError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, GatewayError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    /// Create a new mock gateway with no payments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock already holding one payment.
    pub fn with_payment(payment: GatewayPayment) -> Self {
        let mock = Self::new();
        mock.add_payment(payment);
        mock
    }

    /// A payment the gateway reports as succeeded and paid.
    pub fn succeeded_payment(id: &str, buyer_email: &str, link: Option<&str>) -> GatewayPayment {
        let mut metadata = BTreeMap::from([(
            metadata_keys::BUYER_EMAIL.to_string(),
            buyer_email.to_string(),
        )]);
        if let Some(link) = link {
            metadata.insert(metadata_keys::FULFILLMENT_LINK.to_string(), link.to_string());
        }
        GatewayPayment {
            id: id.to_string(),
            status: PaymentStatus::Succeeded,
            paid: true,
            metadata,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a payment to the "gateway".
    pub fn add_payment(&self, payment: GatewayPayment) {
        let id = payment.id.clone();
        self.inner.lock().unwrap().payments.insert(id, payment);
    }

    /// Flip a stored payment to succeeded and paid. Returns false if unknown.
    pub fn mark_succeeded(&self, payment_id: &str) -> bool {
        let mut state = self.inner.lock().unwrap();
        match state.payments.get_mut(payment_id) {
            Some(payment) => {
                payment.status = PaymentStatus::Succeeded;
                payment.paid = true;
                true
            }
            None => false,
        }
    }

    /// Answer future creations without a confirmation URL.
    pub fn omit_confirmation_url(&self) {
        self.inner.lock().unwrap().omit_confirmation_url = true;
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Every creation request accepted so far.
    pub fn created_requests(&self) -> Vec<CreatePaymentRequest> {
        self.inner.lock().unwrap().created.clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().call_log.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), GatewayError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<CreatedPayment, GatewayError> {
        self.record_call(
            "create_payment",
            vec![
                request.amount.to_string(),
                request.idempotence_key.to_string(),
            ],
        );
        self.check_error("create_payment")?;

        let mut state = self.inner.lock().unwrap();

        let id = format!("pay_mock_{}", uuid::Uuid::new_v4().simple());
        let confirmation_url = if state.omit_confirmation_url {
            None
        } else {
            Some(format!("https://mock-gateway.test/checkout/{}", id))
        };

        state.payments.insert(
            id.clone(),
            GatewayPayment {
                id: id.clone(),
                status: PaymentStatus::Pending,
                paid: false,
                metadata: request.metadata.clone(),
            },
        );
        state.created.push(request);

        Ok(CreatedPayment {
            id,
            status: PaymentStatus::Pending,
            confirmation_url,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<GatewayPayment, GatewayError> {
        self.record_call("get_payment", vec![payment_id.to_string()]);
        self.check_error("get_payment")?;

        let state = self.inner.lock().unwrap();
        state
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("Payment"))
    }
}
