//! Product configuration: what is sold, for how much, and what gets delivered

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::checkout::{Amount, AmountError};

pub(crate) const FULFILLMENT_LINK_KEY: &str = "PLANER__PRODUCT__FULFILLMENT_LINK";

/// Product configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    /// Display name used in payment descriptions
    #[serde(default = "default_name")]
    pub name: String,

    /// Product code stored in payment metadata
    #[serde(default = "default_code")]
    pub code: String,

    /// Price in major units, e.g. `199` or `199.50`
    #[serde(default = "default_price")]
    pub price: String,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Link delivered to the buyer after payment
    #[serde(default)]
    pub fulfillment_link: Option<String>,
}

impl ProductConfig {
    /// Configured price as an amount.
    pub fn amount(&self) -> Result<Amount, AmountError> {
        Amount::parse(&self.price, &self.currency)
    }

    /// Fulfillment link, if set and not blank.
    pub fn fulfillment_link(&self) -> Option<&str> {
        self.fulfillment_link
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Payment description shown on the hosted checkout page.
    pub fn payment_description(&self, amount: &Amount) -> String {
        format!(
            "{} — полный доступ ({} {})",
            self.name,
            amount.display_value(),
            amount.currency()
        )
    }

    pub fn missing_keys(&self) -> Vec<&'static str> {
        if self.fulfillment_link().is_none() {
            vec![FULFILLMENT_LINK_KEY]
        } else {
            Vec::new()
        }
    }

    /// Validate product configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.amount()
            .map(|_| ())
            .map_err(|e| ValidationError::InvalidPrice(e.to_string()))
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            code: default_code(),
            price: default_price(),
            currency: default_currency(),
            fulfillment_link: None,
        }
    }
}

fn default_name() -> String {
    "Planer".to_string()
}

fn default_code() -> String {
    "planer_full_access".to_string()
}

fn default_price() -> String {
    "199".to_string()
}

fn default_currency() -> String {
    "RUB".to_string()
}
