use thiserror::Error;

/// Why a completion request failed.
///
/// Callers in the chat layer treat every variant the same way; the split
/// exists for diagnostics.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider response contained no choices")]
    EmptyChoices,
}

impl LlmError {
    /// True for failures caused by the credential (missing, rejected)
    pub fn is_auth(&self) -> bool {
        match self {
            LlmError::MissingApiKey => true,
            LlmError::Status { status, .. } => {
                *status == reqwest::StatusCode::UNAUTHORIZED || *status == reqwest::StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}
