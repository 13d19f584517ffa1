use serde::{Deserialize, Serialize};

use crate::turn::{Role, Turn};

/// Message structure for the chat completions API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User.as_str().to_string(),
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().as_str().to_string(),
            content: turn.content().to_string(),
        }
    }
}

/// Request body for `POST /chat/completions`.
///
/// With no sampling overrides the body is exactly `{messages, model}`.
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build a single-message request; earlier turns are never replayed.
    pub fn single_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(prompt)],
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}
