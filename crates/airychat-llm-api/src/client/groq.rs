use async_trait::async_trait;

use airychat_logging::{log_request, log_request_to_file, log_response, log_response_to_file};
use airychat_logging::request_logger::request_timestamp;
use airychat_models::{ChatMessage, ChatRequest, ChatResponse};

use crate::client::{Completion, LlmClient};
use crate::error::LlmError;

/// Client for Groq and other OpenAI-compatible `/chat/completions` endpoints
pub struct GroqLlmClient {
    api_key: String,
    model: String,
    api_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    verbose: bool,
    log_to_file: bool,
    client: reqwest::Client,
}

impl GroqLlmClient {
    pub fn new(api_key: String, model: String, api_url: String) -> Self {
        Self {
            api_key,
            model,
            api_url,
            temperature: None,
            max_tokens: None,
            verbose: false,
            log_to_file: false,
            client: reqwest::Client::new(),
        }
    }

    /// Dump requests and responses to the console (and to files under
    /// `~/.airychat/logs` when `log_to_file` is set)
    pub fn with_debug(mut self, verbose: bool, log_to_file: bool) -> Self {
        self.verbose = verbose;
        self.log_to_file = log_to_file;
        self
    }

    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn build_request(&self, messages: &[ChatMessage]) -> ChatRequest {
        ChatRequest {
            messages: messages.to_vec(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for GroqLlmClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<Completion, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let request = self.build_request(messages);
        let timestamp = request_timestamp();

        log_request(&self.api_url, &request, &self.api_key, self.verbose);
        if self.log_to_file {
            if let Err(e) = log_request_to_file(&self.api_url, &request, &self.api_key, timestamp) {
                tracing::warn!("{:#}", e);
            }
        }

        tracing::debug!(model = %self.model, url = %self.api_url, "sending chat completion request");

        let response = self.client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::Transport { url: self.api_url.clone(), source })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|source| LlmError::Transport { url: self.api_url.clone(), source })?;

        log_response(status, &response_text, self.verbose);
        if self.log_to_file {
            if let Err(e) = log_response_to_file(status, &response_text, timestamp, &self.model) {
                tracing::warn!("{:#}", e);
            }
        }

        if !status.is_success() {
            return Err(LlmError::Status { status, body: response_text });
        }

        let chat_response: ChatResponse = serde_json::from_str(&response_text)?;
        let usage = chat_response.usage;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyChoices)?;

        Ok(Completion { content, usage })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
