use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Prefix shown in front of every failed exchange.
pub const ERROR_MARKER: &str = "An error occurred: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Why an exchange with the model failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Api,
    Quota,
    Malformed,
    Blocked,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Api => "api",
            ErrorKind::Quota => "quota",
            ErrorKind::Malformed => "malformed response",
            ErrorKind::Blocked => "blocked",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TurnBody {
    Content { text: String },
    Error { kind: ErrorKind, message: String },
}

impl TurnBody {
    pub fn content(text: impl Into<String>) -> Self {
        TurnBody::Content { text: text.into() }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        TurnBody::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TurnBody::Error { .. })
    }

    /// The text a reader sees. Errors carry the fixed marker.
    pub fn display_text(&self) -> String {
        match self {
            TurnBody::Content { text } => text.clone(),
            TurnBody::Error { message, .. } => format!("{ERROR_MARKER}{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub body: TurnBody,
    pub at: DateTime<Local>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, TurnBody::content(text))
    }

    pub fn assistant(body: TurnBody) -> Self {
        Self::new(Role::Assistant, body)
    }

    fn new(role: Role, body: TurnBody) -> Self {
        Self {
            role,
            body,
            at: Local::now(),
        }
    }
}

/// Append-only record of what the user has seen in this session.
#[derive(Debug, Default, Clone)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Flat view of the conversation, one string per turn.
    pub fn texts(&self) -> Vec<String> {
        self.turns.iter().map(|t| t.body.display_text()).collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_carries_marker() {
        let body = TurnBody::error(ErrorKind::Quota, "429 Too Many Requests");
        assert!(body.is_error());
        assert_eq!(body.display_text(), "An error occurred: 429 Too Many Requests");
    }

    #[test]
    fn texts_follow_insertion_order() {
        let mut state = ConversationState::new();
        state.push(Turn::user("hello"));
        state.push(Turn::assistant(TurnBody::content("hi there")));
        state.push(Turn::user("again"));
        assert_eq!(state.texts(), vec!["hello", "hi there", "again"]);
        assert_eq!(state.turns()[1].role, Role::Assistant);

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn turn_body_serializes_tagged() {
        let value = serde_json::to_value(TurnBody::error(ErrorKind::Network, "boom")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "error", "kind": "network", "message": "boom" })
        );

        let value = serde_json::to_value(TurnBody::content("ok")).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "content", "text": "ok" }));
    }
}
