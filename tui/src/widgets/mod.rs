//! Custom widgets for the chat surface

pub mod transcript;
pub mod typing_indicator;

pub use transcript::{Transcript, TranscriptState};
pub use typing_indicator::TypingIndicator;
