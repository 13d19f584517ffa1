use std::env;
use std::sync::Arc;

use crate::client::{LlmClient, groq::GroqLlmClient};
use crate::config::{AIRY_API_KEY_ENV, BackendType, get_default_url_for_backend, normalize_api_url};

/// Knobs applied to every client the factory builds
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Print request/response dumps to the console
    pub verbose: bool,
    /// Also write request/response dumps under `~/.airychat/logs`
    pub log_to_file: bool,
}

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client for `backend`.
    ///
    /// # Arguments
    /// * `backend` - The backend type to use (Groq, OpenAI)
    /// * `api_key` - API key; falls back to the environment (see [`ClientFactory::resolve_api_key`])
    /// * `model` - Model name to use
    /// * `api_url` - Optional custom API URL (uses the backend default if None)
    /// * `options` - Sampling and debug options
    pub fn create(
        backend: BackendType,
        api_key: Option<String>,
        model: String,
        api_url: Option<String>,
        options: ClientOptions,
    ) -> Arc<dyn LlmClient> {
        let url = api_url
            .map(|url| normalize_api_url(&url))
            .unwrap_or_else(|| get_default_url_for_backend(backend).to_string());
        // A blank key is reported to the user by the app; the client fails fast on it
        let key = Self::resolve_api_key(backend, api_key).unwrap_or_default();

        // Groq speaks the OpenAI wire format, so both backends share one client
        Arc::new(
            GroqLlmClient::new(key, model, url)
                .with_sampling(options.temperature, options.max_tokens)
                .with_debug(options.verbose, options.log_to_file),
        )
    }

    /// Resolve the API key: explicit value, then `AIRY_AI_TOKEN`, then the
    /// backend's own variable. Blank values are skipped.
    pub fn resolve_api_key(backend: BackendType, explicit: Option<String>) -> Option<String> {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var(AIRY_API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
            .or_else(|| env::var(backend.api_key_env()).ok().filter(|key| !key.trim().is_empty()))
    }
}
