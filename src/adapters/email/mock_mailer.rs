//! In-memory mailer for testing.
//!
//! Stores messages instead of sending them. Failure can be injected to
//! exercise retry paths.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{EmailMessage, MailError, MailReceipt, Mailer};

/// Mock mailer recording every delivered message.
#[derive(Clone, Default)]
pub struct MockMailer {
    inner: Arc<Mutex<MockMailerState>>,
}

#[derive(Default)]
struct MockMailerState {
    sent: Vec<EmailMessage>,
    attempts: usize,
    failure: Option<MailError>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a transport error.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_failure(MailError::transport("SMTP relay unavailable"));
        mock
    }

    /// Fail every send with `error` until [`MockMailer::recover`] is called.
    pub fn set_failure(&self, error: MailError) {
        self.inner.lock().unwrap().failure = Some(error);
    }

    pub fn recover(&self) {
        self.inner.lock().unwrap().failure = None;
    }

    /// Messages accepted so far.
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }

    /// Sends tried, including failed ones.
    pub fn attempts(&self) -> usize {
        self.inner.lock().unwrap().attempts
    }

    pub fn clear(&self) {
        let mut state = self.inner.lock().unwrap();
        state.sent.clear();
        state.attempts = 0;
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: EmailMessage) -> Result<MailReceipt, MailError> {
        let mut state = self.inner.lock().unwrap();
        state.attempts += 1;

        if let Some(error) = &state.failure {
            return Err(error.clone());
        }

        state.sent.push(message);
        Ok(MailReceipt {
            message_id: Some(format!("<mock-{}@planer.test>", state.sent.len())),
        })
    }
}
