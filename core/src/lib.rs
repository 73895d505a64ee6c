//! Basava Core - Headless Conversation Logic for the Basavanna Chatbot
//!
//! This crate holds everything about the chatbot that is not drawing:
//! the persona, the model provider, configuration, and the conversation
//! session that ties them together. The terminal surface in `basava-tui`
//! owns a [`ConversationSession`] per mounted chat view and renders it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    basava-tui (ratatui)                  │
//! │        IntroView ──navigate──▶ ChatView ──▶ render       │
//! └──────────────────────────────┬───────────────────────────┘
//!                   submit / poll_reply / messages
//! ┌──────────────────────────────┼───────────────────────────┐
//! │                        BASAVA CORE                       │
//! │  ┌───────────────────┐  ┌─────────────┐  ┌─────────────┐ │
//! │  │ConversationSession│─▶│ ChatHandle  │─▶│ Gemini REST │ │
//! │  └───────────────────┘  └─────────────┘  └─────────────┘ │
//! │       persona · config · messages                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use basava_core::{ConversationSession, GeminiProvider, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = GeminiProvider::from_env();
//!     let mut session = ConversationSession::initialize(&provider, &SessionConfig::default());
//!
//!     session.send_turn("What was the Anubhava Mantapa?").await;
//!     for message in session.messages() {
//!         println!("{}: {}", message.role().as_str(), message.text());
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Provider traits and the Gemini implementation
//! - [`config`]: TOML, environment and CLI configuration layering
//! - [`messages`]: Chat turns and screen identifiers
//! - [`persona`]: Fixed system instruction, greeting and error texts
//! - [`session`]: The conversation session and its admission control
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod messages;
pub mod persona;
pub mod session;

// Re-exports for convenience
pub use backend::{BackendError, ChatConfig, ChatHandle, ChatProvider, GeminiChat, GeminiProvider};
pub use messages::{ChatMessage, MessageRole, Screen};
pub use session::{ConversationSession, IgnoreReason, SessionConfig, Submission};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with, ChatbotConfig,
    ChatbotToml, ConfigError, ConfigOverrides, ConfigSource,
};
