//! Monetary amount value object.

use std::fmt;

use thiserror::Error;

/// Errors from parsing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount is not a decimal number: {0}")]
    Malformed(String),

    #[error("amount has more than two fractional digits")]
    TooPrecise,

    #[error("amount must be positive")]
    NotPositive,

    #[error("amount is too large")]
    Overflow,

    #[error("currency must be a three-letter code: {0}")]
    InvalidCurrency(String),
}

/// A positive amount in a single currency, held in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    minor_units: u64,
    currency: String,
}

impl Amount {
    /// Parses a major-unit decimal such as `199`, `199.5` or `199.50`.
    pub fn parse(value: &str, currency: &str) -> Result<Self, AmountError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match value.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (value, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountError::Malformed(value.to_string()));
        }
        if fraction.len() > 2 {
            return Err(AmountError::TooPrecise);
        }

        let whole: u64 = whole.parse().map_err(|_| AmountError::Overflow)?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => u64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction.parse().map_err(|_| AmountError::Malformed(value.to_string()))?,
        };

        let minor_units = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;

        Self::from_minor_units(minor_units, currency)
    }

    /// Builds an amount from minor units (kopecks, cents).
    pub fn from_minor_units(minor_units: u64, currency: &str) -> Result<Self, AmountError> {
        if minor_units == 0 {
            return Err(AmountError::NotPositive);
        }

        let currency = currency.trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(AmountError::InvalidCurrency(currency));
        }

        Ok(Self {
            minor_units,
            currency,
        })
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Value with exactly two decimals, as gateways expect it (`"199.00"`).
    pub fn value_string(&self) -> String {
        format!("{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }

    /// Value for humans: whole amounts drop the decimals (`"199"`).
    pub fn display_value(&self) -> String {
        if self.minor_units % 100 == 0 {
            (self.minor_units / 100).to_string()
        } else {
            self.value_string()
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value_string(), self.currency)
    }
}
