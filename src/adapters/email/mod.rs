//! Email adapters implementing the `Mailer` port.
//!
//! - `SmtpMailer` - authenticated SMTP relay via `lettre`
//! - `MockMailer` - in-memory mailer for tests

mod mock_mailer;
mod smtp_mailer;

pub use mock_mailer::MockMailer;
pub use smtp_mailer::SmtpMailer;
