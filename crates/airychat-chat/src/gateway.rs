use std::sync::Arc;

use airychat_llm_api::LlmClient;
use airychat_models::ChatMessage;

use crate::locale::Locale;

/// Boundary to the completion provider.
///
/// Sends the prompt as the only message and never fails: any provider
/// error is logged and replaced by the fallback text. There is no retry.
pub struct CompletionGateway {
    client: Arc<dyn LlmClient>,
    fallback: String,
}

impl CompletionGateway {
    pub fn new(client: Arc<dyn LlmClient>, locale: Locale) -> Self {
        Self::with_fallback(client, locale.fallback_message())
    }

    pub fn with_fallback(client: Arc<dyn LlmClient>, fallback: impl Into<String>) -> Self {
        Self {
            client,
            fallback: fallback.into(),
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Best-effort completion of `prompt`. Callers must not overlap calls.
    pub async fn complete(&self, prompt: &str) -> String {
        let messages = [ChatMessage::user(prompt)];

        match self.client.chat_completion(&messages).await {
            Ok(completion) => {
                if let Some(usage) = completion.usage {
                    tracing::debug!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        total_tokens = usage.total_tokens,
                        "completion received"
                    );
                }
                completion.content
            }
            Err(e) => {
                tracing::error!(model = %self.client.model(), error = %e, "error fetching response from AI");
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airychat_llm_api::{Completion, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoClient {
        seen: Mutex<Vec<Vec<ChatMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err(LlmError::EmptyChoices);
            }
            Ok(Completion { content: format!("echo: {}", messages[0].content), usage: None })
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_sends_single_user_message() {
        let client = Arc::new(EchoClient { seen: Mutex::new(Vec::new()), fail: false });
        let gateway = CompletionGateway::new(client.clone(), Locale::En);

        assert_eq!(gateway.complete("hello").await, "echo: hello");
        assert_eq!(gateway.model(), "echo");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], vec![ChatMessage::user("hello")]);
    }

    #[tokio::test]
    async fn test_error_becomes_fallback() {
        let client = Arc::new(EchoClient { seen: Mutex::new(Vec::new()), fail: true });
        let gateway = CompletionGateway::new(client, Locale::Id);

        assert_eq!(gateway.complete("halo").await, "Terjadi kesalahan. Silakan coba lagi.");
    }
}
