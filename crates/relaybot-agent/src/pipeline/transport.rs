use async_trait::async_trait;

use relaybot_core::ChatMessage;

/// Chat-platform operations the pipeline needs.
///
/// Implemented over serenity's REST client in `relaybot-discord`, and by
/// in-memory fakes in tests.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Up to `limit` most recent messages in `channel_id`, newest first.
    async fn fetch_recent(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, TransportError>;

    /// Show the typing indicator in `channel_id`.
    async fn start_typing(&self, channel_id: u64) -> Result<(), TransportError>;

    /// Post `content` in `to`'s channel as a reply to `to`.
    async fn reply(&self, to: &ChatMessage, content: &str) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("history fetch failed: {0}")]
    History(String),

    #[error("typing indicator failed: {0}")]
    Typing(String),

    #[error("send failed: {0}")]
    Send(String),
}
