use async_trait::async_trait;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push service rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Best-effort delivery of a push notification to one device.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Returns the provider's message id on success.
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<String, NotificationError>;

    /// Sends to every token and returns how many were accepted.
    async fn send_multicast(&self, tokens: &[String], title: &str, body: &str) -> usize {
        let mut delivered = 0;
        for token in tokens {
            match self.send(token, title, body).await {
                Ok(_) => delivered += 1,
                Err(e) => tracing::error!("Multicast delivery to one device failed: {}", e),
            }
        }
        tracing::info!(
            "Multicast notification sent to {} devices, {} successful",
            tokens.len(),
            delivered
        );
        delivered
    }
}

/// Sender used when no push provider is configured: logs the message and
/// reports it as delivered.
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<String, NotificationError> {
        tracing::info!("[push disabled] to {}: {} - {}", token, title, body);
        Ok(format!("log-{}", uuid::Uuid::new_v4()))
    }
}
