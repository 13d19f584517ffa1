use std::fmt;

pub mod factory;
pub use factory::{ClientFactory, ClientOptions};

/// Backend type for chat completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Groq,
    OpenAI,
}

impl BackendType {
    /// Parse backend type from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            "openai" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
        }
    }

    /// Provider-specific environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default Groq API URL
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model identifier sent when none is configured
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Environment variable checked first for the API key, whatever the backend
pub const AIRY_API_KEY_ENV: &str = "AIRY_AI_TOKEN";

/// Get the default URL for a given backend type
pub fn get_default_url_for_backend(backend: BackendType) -> &'static str {
    match backend {
        BackendType::Groq => GROQ_API_URL,
        BackendType::OpenAI => OPENAI_API_URL,
    }
}

/// Parse a model string in format "model@backend(api_url)", "model@backend" or "model".
/// Returns (model_name, backend, api_url)
pub fn parse_model_spec(spec: &str) -> (String, Option<BackendType>, Option<String>) {
    let Some((model, backend_part)) = spec.split_once('@') else {
        return (spec.to_string(), None, None);
    };

    match backend_part.split_once('(') {
        Some((backend_name, rest)) => {
            let url = rest.strip_suffix(')').unwrap_or(rest);
            (model.to_string(), BackendType::from_str(backend_name), Some(url.to_string()))
        }
        None => (model.to_string(), BackendType::from_str(backend_part), None),
    }
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    let base = url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}
