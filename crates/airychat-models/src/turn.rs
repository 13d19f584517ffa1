use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    // Older transcripts label the model's side "ai"
    #[serde(alias = "ai")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" | "ai" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message exchanged in the chat, tagged by speaker.
///
/// Turns are immutable once created; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_role_accepts_legacy_ai_label() {
        let role: Role = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(role, Role::Assistant);
        assert_eq!(Role::from_str("AI"), Some(Role::Assistant));
        assert_eq!(Role::from_str("system"), None);
    }

    #[test]
    fn test_turn_constructors() {
        let turn = Turn::user("2+2?");
        assert!(turn.is_user());
        assert_eq!(turn.content(), "2+2?");

        let turn = Turn::assistant("4");
        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(turn.content(), "4");
    }

    #[test]
    fn test_turn_json_shape() {
        let json = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
    }
}
