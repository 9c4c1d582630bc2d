//! Incoming payment notification envelope.
//!
//! The notification body is a trigger only: it names an event and a payment
//! id. This type intentionally keeps nothing else from the payload, so status,
//! paid flag and metadata can only come from a re-fetch at the gateway.

use serde::Deserialize;

use super::payment::PAYMENT_SUCCEEDED_EVENT;

/// Gateway notification envelope: `{ type, event, object: { id, ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    event: Option<String>,

    #[serde(default)]
    object: Option<NotificationObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct NotificationObject {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

impl PaymentNotification {
    /// Parses a raw body. Returns `None` for anything that is not a JSON object.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        serde_json::from_slice(payload).ok()
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn is_payment_succeeded(&self) -> bool {
        self.event() == Some(PAYMENT_SUCCEEDED_EVENT)
    }

    /// Payment id used as the re-verification lookup key.
    ///
    /// Blank or non-string ids count as absent, as do the dot segments
    /// `.` and `..`, which cannot name a single payment in a URL path.
    pub fn payment_id(&self) -> Option<&str> {
        self.object
            .as_ref()
            .and_then(|object| object.id.as_ref())
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "." && *id != "..")
    }
}
