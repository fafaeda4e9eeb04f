use async_trait::async_trait;

use blog_core::pii::{mask_email, mask_emails_in};
use blog_core::ports::{MailError, MailMessage, Mailer};

/// Writes outgoing messages to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidAddress("no recipients".to_string()));
        }

        let to: Vec<String> = message.to.iter().map(|addr| mask_email(addr)).collect();
        tracing::info!(
            from = %message.from,
            to = ?to,
            subject = %mask_emails_in(&message.subject),
            body = %message.body,
            "Mail message (console backend)"
        );
        Ok(())
    }
}
