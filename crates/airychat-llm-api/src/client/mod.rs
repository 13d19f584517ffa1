use async_trait::async_trait;

use airychat_models::{ChatMessage, Usage};
use crate::error::LlmError;

pub mod groq;

/// Text of a completion plus the provider's token accounting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Usage>,
}

/// LLM client trait - the seam between the chat layer and a provider
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `messages` as the whole conversation and return the first choice.
    ///
    /// The provider keeps no memory between calls.
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError>;

    /// Model identifier sent with every request
    fn model(&self) -> &str;
}
