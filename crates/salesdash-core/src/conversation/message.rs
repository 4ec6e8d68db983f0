//! Conversation message types.
//!
//! This module contains types for representing messages in the assistant
//! conversation, including roles and message content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Question typed by the user.
    User,
    /// Answer (or apology) from the assistant.
    Assistant,
}

/// A single message in the conversation log.
///
/// User text is kept raw; assistant text is markdown and rendered by the host.
/// Messages are never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub text: String,
    /// When the message was appended. Display only, never used for ordering.
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
