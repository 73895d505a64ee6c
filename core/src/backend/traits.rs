//! Provider Traits
//!
//! The model provider is consumed as an opaque capability with two calls:
//! create a chat (fixed model + system instruction), then send text to that
//! chat and get text back. Everything provider-specific (wire format, auth,
//! endpoints) lives behind these traits.
//!
//! # Design Philosophy
//!
//! A [`ChatHandle`] is a scoped resource. Whoever owns it owns the
//! conversation context; dropping it ends the conversation. Its configuration
//! is fixed at creation and there are no setters.

use async_trait::async_trait;

use crate::messages::ChatMessage;
use crate::persona::{DEFAULT_MODEL, SYSTEM_INSTRUCTION};

/// Configuration a chat is created with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    /// Provider-specific model identifier
    pub model: String,
    /// System instruction sent with every request
    pub system_instruction: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

impl ChatConfig {
    /// Create a configuration for a model and system instruction
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
        }
    }

    /// Replace the model identifier
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }
}

/// An open conversation context with a provider
///
/// Implementations keep their own turn history so each request carries the
/// full conversation.
#[async_trait]
pub trait ChatHandle: Send {
    /// Model this chat was created for
    fn model(&self) -> &str;

    /// System instruction this chat was created with
    fn system_instruction(&self) -> &str;

    /// Turns the provider has acknowledged so far
    fn history(&self) -> &[ChatMessage];

    /// Send one user turn and wait for the model's reply text
    async fn send_message(&mut self, text: &str) -> anyhow::Result<String>;
}

/// A model provider able to open chats
///
/// Implement this trait to add support for a different provider.
pub trait ChatProvider: Send + Sync {
    /// Provider name for logs (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Open a new chat
    ///
    /// Fails when the provider cannot be used at all, for example when no
    /// credential is configured.
    fn create_chat(&self, config: &ChatConfig) -> anyhow::Result<Box<dyn ChatHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_builder() {
        let config = ChatConfig::default()
            .with_model("gemini-2.0-flash")
            .with_system_instruction("Only talk about vachanas");

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.system_instruction, "Only talk about vachanas");
    }

    #[test]
    fn test_chat_config_default_uses_persona() {
        let config = ChatConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.system_instruction.contains("Basavanna"));
    }
}
