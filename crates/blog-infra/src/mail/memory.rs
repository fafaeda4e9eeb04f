use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{MailError, MailMessage, Mailer};

/// Keeps outgoing messages in memory.
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailer {
    outbox: Arc<RwLock<Vec<MailMessage>>>,
    fail: bool,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Messages delivered so far, oldest first.
    pub async fn sent(&self) -> Vec<MailMessage> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.outbox.write().await.push(message);
        Ok(())
    }
}
