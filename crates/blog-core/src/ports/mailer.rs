//! Mail transport port.

use async_trait::async_trait;
use serde::Serialize;

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mail transport - abstraction over SMTP, console and in-memory backends.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message to all of its recipients.
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
