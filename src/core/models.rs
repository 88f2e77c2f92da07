//! Core data models for translation

use serde::Serialize;
use std::fmt;

use crate::core::errors::TranslationError;

/// Warning text when the provider returns nothing usable
pub const EMPTY_TRANSLATION_WARNING: &str = "No translation returned or input was short/empty";

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Task framing sent before the user content
    System,
    /// The text to translate
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Translation request: the system instruction plus the wrapped user text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub instruction: String,
    pub user_text: String,
}

impl TranslationRequest {
    /// The two messages sent to the chat-completion endpoint, system first
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.instruction.clone()),
            ChatMessage::user(self.user_text.clone()),
        ]
    }
}

/// Result of one invocation, formatted for the host application on display
#[derive(Debug)]
pub enum TranslationOutcome {
    /// Non-empty, trimmed translation
    Translated(String),
    /// Soft signal, not a failure
    Warning(String),
    /// Terminal error for this invocation
    Failed(TranslationError),
}

impl TranslationOutcome {
    /// Normalize raw provider content: trim, and downgrade empty to a warning
    pub fn from_content(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            TranslationOutcome::Warning(EMPTY_TRANSLATION_WARNING.to_string())
        } else {
            TranslationOutcome::Translated(trimmed.to_string())
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, TranslationOutcome::Translated(_))
    }
}

impl From<TranslationError> for TranslationOutcome {
    fn from(err: TranslationError) -> Self {
        TranslationOutcome::Failed(err)
    }
}

impl fmt::Display for TranslationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationOutcome::Translated(text) => write!(f, "{}", text),
            TranslationOutcome::Warning(message) => write!(f, "!Warning: {}", message),
            TranslationOutcome::Failed(err) => write!(f, "!! Error: {}", err),
        }
    }
}
