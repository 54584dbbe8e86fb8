//! Ephemeral conversation session.
//!
//! A session lives for one visit to a location and owns no persistent
//! identity. The client keeps it between requests and sends it back with
//! every turn.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum characters accepted in a single learner message.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub messages: Vec<ChatMessage>,
    pub turn_count: u32,
    pub selected_topic: Option<String>,
}

impl ConversationSession {
    pub fn new(selected_topic: Option<String>) -> Self {
        Self {
            selected_topic,
            ..Self::default()
        }
    }

    /// Rebuild a session from client-held state.
    pub fn resume(
        messages: Vec<ChatMessage>,
        turn_count: u32,
        selected_topic: Option<String>,
    ) -> Self {
        Self {
            messages,
            turn_count,
            selected_topic,
        }
    }

    /// Append a learner message. The turn count moves exactly once per call.
    pub fn submit_user_message(&mut self, text: &str) -> Result<u32, CoreError> {
        let text = validate_user_message(text)?;
        let next = self
            .turn_count
            .checked_add(1)
            .ok_or_else(|| CoreError::Validation("Turn count is out of range".to_string()))?;
        self.messages.push(ChatMessage::user(text));
        self.turn_count = next;
        Ok(next)
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// The character's most recent line, if any.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.text.as_str())
    }

    /// Ordered model input: the system prompt first, then the history.
    /// System messages supplied by the client are dropped.
    pub fn to_model_messages(&self, system_prompt: String) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(system_prompt))
            .chain(
                self.messages
                    .iter()
                    .filter(|m| m.role != Role::System)
                    .cloned(),
            )
            .collect()
    }
}

/// Trim and bound-check a learner message.
pub fn validate_user_message(text: &str) -> Result<&str, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Message must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
