//! Model Provider Integration
//!
//! This module provides abstracted access to hosted model providers through
//! two small traits: [`ChatProvider`] opens chats, [`ChatHandle`] carries
//! one conversation.
//!
//! # Available Providers
//!
//! - **Gemini**: Google's Gemini API (default)
//!
//! # Usage
//!
//! ```ignore
//! use basava_core::backend::{ChatConfig, ChatProvider, GeminiProvider};
//!
//! let provider = GeminiProvider::from_env();
//! let mut chat = provider.create_chat(&ChatConfig::default())?;
//! let reply = chat.send_message("Who was Basavanna?").await?;
//! ```

mod error;
mod gemini;
mod traits;

pub use error::BackendError;
pub use gemini::{
    GeminiChat, GeminiProvider, API_KEY_VARS, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
};
pub use traits::{ChatConfig, ChatHandle, ChatProvider};
