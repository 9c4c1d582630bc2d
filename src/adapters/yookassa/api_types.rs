//! YooKassa API v3 wire types.
//!
//! Only the fields this service reads or writes are modelled; everything
//! else in the gateway's payment object is ignored on deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /v3/payments`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentBody<'a> {
    pub amount: AmountBody<'a>,
    pub capture: bool,
    pub confirmation: ConfirmationRequest<'a>,
    pub description: &'a str,
    pub metadata: &'a BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountBody<'a> {
    /// Major units with two decimals, e.g. `"199.00"`.
    pub value: &'a str,
    pub currency: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub return_url: &'a str,
}

impl<'a> ConfirmationRequest<'a> {
    pub fn redirect(return_url: &'a str) -> Self {
        Self {
            kind: "redirect",
            return_url,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Payment object as returned by create and fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct YooKassaPayment {
    pub id: String,

    pub status: String,

    #[serde(default)]
    pub paid: bool,

    #[serde(default)]
    pub confirmation: Option<ConfirmationResponse>,

    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl YooKassaPayment {
    /// Metadata with non-string values dropped.
    pub fn string_metadata(&self) -> BTreeMap<String, String> {
        self.metadata
            .iter()
            .flatten()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
            .collect()
    }

    pub fn confirmation_url(&self) -> Option<&str> {
        self.confirmation
            .as_ref()
            .and_then(|c| c.confirmation_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationResponse {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub confirmation_url: Option<String>,
}

/// Error body, e.g. `{"type":"error","code":"invalid_credentials","description":"..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_serializes_gateway_shape() {
        let metadata = BTreeMap::from([
            ("buyer_email".to_string(), "buyer@example.com".to_string()),
            ("product".to_string(), "planer_full_access".to_string()),
        ]);
        let body = CreatePaymentBody {
            amount: AmountBody {
                value: "199.00",
                currency: "RUB",
            },
            capture: true,
            confirmation: ConfirmationRequest::redirect("https://shop.test/?paid=1"),
            description: "Planer",
            metadata: &metadata,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "amount": { "value": "199.00", "currency": "RUB" },
                "capture": true,
                "confirmation": { "type": "redirect", "return_url": "https://shop.test/?paid=1" },
                "description": "Planer",
                "metadata": { "buyer_email": "buyer@example.com", "product": "planer_full_access" }
            })
        );
    }

    #[test]
    fn payment_parses_with_confirmation() {
        let payment: YooKassaPayment = serde_json::from_value(json!({
            "id": "2d8f3e5a-000f-5000-9000-1b2c3d4e5f60",
            "status": "pending",
            "paid": false,
            "amount": { "value": "199.00", "currency": "RUB" },
            "confirmation": {
                "type": "redirect",
                "confirmation_url": "https://yoomoney.ru/checkout/payments/v2/contract?orderId=1"
            },
            "test": true
        }))
        .unwrap();

        assert_eq!(
            payment.confirmation_url(),
            Some("https://yoomoney.ru/checkout/payments/v2/contract?orderId=1")
        );
        assert!(payment.string_metadata().is_empty());
    }

    #[test]
    fn paid_defaults_to_false_and_non_string_metadata_is_dropped() {
        let payment: YooKassaPayment = serde_json::from_value(json!({
            "id": "p1",
            "status": "succeeded",
            "metadata": { "buyer_email": "buyer@example.com", "attempt": 3, "cms_name": null }
        }))
        .unwrap();

        assert!(!payment.paid);
        assert_eq!(payment.confirmation_url(), None);
        let metadata = payment.string_metadata();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["buyer_email"], "buyer@example.com");
    }

    #[test]
    fn payment_without_id_is_rejected() {
        let parsed: Result<YooKassaPayment, _> =
            serde_json::from_value(json!({ "status": "succeeded", "paid": true }));
        assert!(parsed.is_err());
    }
}
