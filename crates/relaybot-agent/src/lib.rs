//! Completion side of the relay: the LLM provider seam, the OpenAI client,
//! and the per-message pipeline that turns channel history into a reply.

pub mod openai;
pub mod pipeline;
pub mod provider;
pub mod runtime;

pub use openai::OpenAiProvider;
pub use provider::{
    ChatRequest, CompletionResult, ConversationEntry, LlmProvider, ProviderError, Role,
};
pub use runtime::RelayRuntime;
