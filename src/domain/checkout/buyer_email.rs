//! Buyer email value object.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Raised when an address fails the minimal shape check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEmail {
    #[error("email is empty")]
    Empty,

    #[error("email must contain '@'")]
    MissingAt,
}

/// A trimmed, non-empty address containing `@`.
///
/// Deliberately permissive: the gateway and the SMTP relay are the real
/// judges of deliverability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BuyerEmail(String);

impl BuyerEmail {
    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidEmail::Empty);
        }
        if !trimmed.contains('@') {
            return Err(InvalidEmail::MissingAt);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BuyerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
