//! Main Application
//!
//! The App struct is the root router and owns the terminal lifecycle:
//! - Event loop (keyboard, resize)
//! - Which screen is mounted
//! - The chat view (and with it the conversation session) while on chat
//!
//! Leaving the chat screen drops the chat view, so the next visit starts a
//! brand new session with only the greeting.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::time::MissedTickBehavior;

use basava_core::{ChatProvider, Screen, SessionConfig};

use crate::theme;
use crate::views::{ChatView, IntroView, ViewAction};

/// Target ~10 FPS; enough for the typing indicator
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Mounted screen
    screen: Screen,
    /// Landing page
    intro: IntroView,
    /// Chat view, present only while on the chat screen
    chat: Option<ChatView>,
    /// Opens a session for each chat mount
    provider: Arc<dyn ChatProvider>,
    /// What each session is opened with
    session_config: SessionConfig,
}

impl App {
    /// Create the app on the intro screen
    pub fn new(provider: Arc<dyn ChatProvider>, session_config: SessionConfig) -> Self {
        Self {
            running: true,
            screen: Screen::Intro,
            intro: IntroView::new(),
            chat: None,
            provider,
            session_config,
        }
    }

    /// Mounted screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The chat view, if mounted
    pub fn chat(&self) -> Option<&ChatView> {
        self.chat.as_ref()
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mount a fresh chat view
    pub fn navigate_to_chat(&mut self) {
        tracing::debug!("Navigating to chat");
        self.chat = Some(ChatView::new(self.provider.as_ref(), &self.session_config));
        self.screen = Screen::Chat;
    }

    /// Drop the chat view and show the introduction
    pub fn navigate_to_intro(&mut self) {
        tracing::debug!("Navigating to intro");
        self.chat = None;
        self.screen = Screen::Intro;
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        let action = match (self.screen, self.chat.as_mut()) {
            (Screen::Chat, Some(chat)) => chat.handle_key(key),
            _ => self.intro.handle_key(key),
        };

        match action {
            ViewAction::None => {}
            ViewAction::NavigateToChat => self.navigate_to_chat(),
            ViewAction::NavigateToIntro => self.navigate_to_intro(),
            ViewAction::Quit => self.running = false,
        }
    }

    /// Per-frame work for the mounted view
    pub fn tick(&mut self) {
        if let Some(chat) = self.chat.as_mut() {
            chat.tick();
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let [body, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        match (self.screen, self.chat.as_mut()) {
            (Screen::Chat, Some(chat)) => chat.render(frame, body),
            _ => frame.render_widget(&self.intro, body),
        }

        self.render_status(frame, status);
    }

    /// Render status bar
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" basava-chat", theme::accent()),
            Span::styled(format!(" · {}", self.screen.title()), theme::hint()),
        ];
        if let Some(model) = self.chat.as_ref().and_then(|c| c.session().model()) {
            spans.push(Span::styled(format!(" · {model}"), theme::hint()));
        }
        spans.push(Span::styled("   Ctrl+C quit", theme::hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_tick = tokio::time::interval(FRAME_DURATION);
        frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                    None => {
                        tracing::info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                // Frame tick - collect replies and animate
                _ = frame_tick.tick() => self.tick(),
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("running", &self.running)
            .field("screen", &self.screen)
            .field("chat", &self.chat)
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}
