//! Message Model
//!
//! The plain records shared by the session and every surface: a chat turn
//! and the screen identifier the router switches on.
//!
//! Messages carry no behaviour. A [`ChatMessage`] never changes after it is
//! created; history grows only by appending new ones.

use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Typed by the person at the keyboard
    User,
    /// Produced by the model (or synthesized on its behalf)
    Model,
}

impl MessageRole {
    /// Wire name used by the provider API
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One turn of the conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: MessageRole,
    text: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// A user-authored message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// A model-authored message
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Model, text)
    }

    /// Author of this turn
    #[must_use]
    pub fn role(&self) -> MessageRole {
        self.role
    }

    /// Message body, exactly as typed or returned
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True for user-authored turns
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Which full-screen view is mounted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Landing page with the introductory content
    #[default]
    Intro,
    /// Conversation with the model
    Chat,
}

impl Screen {
    /// Title shown in the terminal status line
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Intro => "Introduction",
            Self::Chat => "Chat",
        }
    }
}
