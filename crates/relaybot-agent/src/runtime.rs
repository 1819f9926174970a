use tracing::debug;

use relaybot_core::config::RelaySettings;
use relaybot_core::RelayConfig;

use crate::provider::{ChatRequest, CompletionResult, ConversationEntry, LlmProvider, ProviderError};

/// Process-wide relay state: the provider handle plus the immutable settings
/// every message task reads. Shared across tasks via `Arc`.
pub struct RelayRuntime {
    provider: Box<dyn LlmProvider>,
    model: String,
    target_channel: u64,
    settings: RelaySettings,
}

impl RelayRuntime {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        model: String,
        target_channel: u64,
        settings: RelaySettings,
    ) -> Self {
        Self {
            provider,
            model,
            target_channel,
            settings,
        }
    }

    /// Build a runtime from loaded config around an already-constructed provider.
    pub fn from_config(config: &RelayConfig, provider: Box<dyn LlmProvider>) -> Self {
        Self::new(
            provider,
            config.openai.model.clone(),
            config.discord.channel_id,
            config.relay.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The only channel this relay listens and replies in.
    pub fn target_channel(&self) -> u64 {
        self.target_channel
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Send one conversation log to the provider.
    pub async fn complete(
        &self,
        messages: Vec<ConversationEntry>,
    ) -> Result<Option<CompletionResult>, ProviderError> {
        let req = ChatRequest {
            model: self.model.clone(),
            messages,
        };
        debug!(
            provider = self.provider.name(),
            model = %req.model,
            entries = req.messages.len(),
            "requesting completion"
        );
        self.provider.send(&req).await
    }
}
