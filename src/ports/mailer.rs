//! Mailer port for outbound email.
//!
//! One message, one recipient. Implementations decide transport (SMTP in
//! production, in-memory for tests) and never retry on their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::checkout::{BuyerEmail, EmailContent};

/// Port for sending email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single message.
    async fn send(&self, message: EmailMessage) -> Result<MailReceipt, MailError>;
}

/// Message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: BuyerEmail,
    pub content: EmailContent,
}

impl EmailMessage {
    pub fn new(to: BuyerEmail, content: EmailContent) -> Self {
        Self { to, content }
    }
}

/// Acknowledgement from the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailReceipt {
    /// `Message-ID` header of the sent message, when known.
    pub message_id: Option<String>,
}

/// Mail delivery error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct MailError {
    pub code: MailErrorCode,
    pub message: String,
}

impl MailError {
    pub fn new(code: MailErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(MailErrorCode::Configuration, message)
    }

    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::new(MailErrorCode::InvalidAddress, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(MailErrorCode::Transport, message)
    }
}

/// Mail error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailErrorCode {
    /// SMTP settings are missing or unusable.
    Configuration,

    /// Sender or recipient could not be parsed as a mailbox.
    InvalidAddress,

    /// The relay refused the message or could not be reached.
    Transport,
}

impl std::fmt::Display for MailErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MailErrorCode::Configuration => "configuration",
            MailErrorCode::InvalidAddress => "invalid_address",
            MailErrorCode::Transport => "transport",
        };
        write!(f, "{}", s)
    }
}
