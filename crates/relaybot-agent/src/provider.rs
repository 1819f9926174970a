use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Speaker role of a conversation entry, as the chat-completions API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation log sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    /// Sanitized speaker name. Omitted from the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConversationEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }
}

/// Request to an LLM provider. Built once per admitted message.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ConversationEntry>,
}

/// The top-ranked candidate returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub role: Role,
    pub content: String,
}

/// Common interface for completion backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Send a non-streaming chat request and wait for the full response.
    ///
    /// `Ok(None)` means the provider answered but offered no usable candidate.
    async fn send(&self, req: &ChatRequest) -> Result<Option<CompletionResult>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_without_name_omits_field() {
        let json = serde_json::to_value(ConversationEntry::system("be nice")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "be nice"}));
    }

    #[test]
    fn entry_with_name_serializes_lowercase_role() {
        let entry = ConversationEntry {
            role: Role::User,
            content: "hello".to_string(),
            name: Some("John_Doe".to_string()),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content": "hello", "name": "John_Doe"})
        );
    }
}
