//! Outbound mail collaborator boundary.

use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailerError(pub String);

/// External mail delivery seam used by the notification job.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

/// Mailer that only logs deliveries. Default for dev runs without an
/// outbound mail relay.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        tracing::info!(%to, %subject, body_len = body.len(), "mail delivered (log only)");
        Ok(())
    }
}

/// A sent message captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records messages for assertions, optionally failing every
/// send to exercise the job failure path.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        if self.fail {
            return Err(MailerError("smtp relay unavailable".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
