//! Full-screen views
//!
//! Each view handles its own keys and reports navigation back to the
//! router as a [`ViewAction`]; views never switch screens themselves.

pub mod chat;
pub mod intro;

pub use chat::ChatView;
pub use intro::IntroView;

/// What a view asks the router to do after a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewAction {
    /// Stay where we are
    None,
    /// Mount a fresh chat view
    NavigateToChat,
    /// Drop the chat view and show the introduction
    NavigateToIntro,
    /// Leave the application
    Quit,
}
