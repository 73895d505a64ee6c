//! Basava TUI - Terminal interface for the Basavanna chatbot
//!
//! Two full-screen views over the headless `basava-core` session: a static
//! introduction and a chat screen that talks to the configured model.
//!
//! # Architecture
//!
//! - **App**: Root router and terminal event loop
//! - **Views**: Intro and Chat, each mapping keys to a `ViewAction`
//! - **Widgets**: Bottom-anchored transcript and the typing indicator
//! - **Theme**: Amber/orange palette

pub mod app;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::App;
pub use views::{ChatView, IntroView, ViewAction};
