//! Router and view behaviour driven through key events
//!
//! Uses a mock provider whose replies wait on a gate, and ratatui's
//! `TestBackend` for render checks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::Semaphore;

use basava_core::persona::{GREETING, INIT_ERROR_MESSAGE};
use basava_core::{ChatConfig, ChatHandle, ChatMessage, ChatProvider, Screen, SessionConfig};
use basava_tui::views::chat::{HEADER_TITLE, PLACEHOLDER};
use basava_tui::views::intro::{CALL_TO_ACTION, TITLE};
use basava_tui::App;

// ============================================================================
// Mock Provider
// ============================================================================

struct MockChat {
    config: ChatConfig,
    history: Vec<ChatMessage>,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl ChatHandle for MockChat {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn system_instruction(&self) -> &str {
        &self.config.system_instruction
    }

    fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    async fn send_message(&mut self, text: &str) -> anyhow::Result<String> {
        self.gate.acquire().await?.forget();
        Ok(format!("On \"{text}\": Basavanna taught that work is worship."))
    }
}

/// Replies once per released permit
struct MockProvider {
    gate: Arc<Semaphore>,
}

impl MockProvider {
    fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Semaphore::new(0)),
        })
    }

    fn instant() -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS / 2)),
        })
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }
}

impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn create_chat(&self, config: &ChatConfig) -> anyhow::Result<Box<dyn ChatHandle>> {
        Ok(Box::new(MockChat {
            config: config.clone(),
            history: Vec::new(),
            gate: Arc::clone(&self.gate),
        }))
    }
}

struct NoKeyProvider;

impl ChatProvider for NoKeyProvider {
    fn name(&self) -> &str {
        "NoKey"
    }

    fn create_chat(&self, _config: &ChatConfig) -> anyhow::Result<Box<dyn ChatHandle>> {
        anyhow::bail!("API key not set")
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
}

fn history_len(app: &App) -> usize {
    app.chat().map_or(0, |chat| chat.session().messages().len())
}

fn is_loading(app: &App) -> bool {
    app.chat().is_some_and(|chat| chat.session().is_loading())
}

/// Tick until the outstanding reply lands
async fn settle(app: &mut App) {
    for _ in 0..200 {
        app.tick();
        if !is_loading(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("reply never arrived");
}

fn render_text(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.render(frame)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

// ============================================================================
// Navigation
// ============================================================================

#[tokio::test]
async fn test_starts_on_intro() {
    let app = App::new(MockProvider::instant(), SessionConfig::default());

    assert_eq!(app.screen(), Screen::Intro);
    assert!(app.chat().is_none());
    assert!(app.is_running());
}

#[tokio::test]
async fn test_enter_opens_chat_with_greeting() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());

    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.screen(), Screen::Chat);
    let chat = app.chat().unwrap();
    assert_eq!(chat.session().messages(), &[ChatMessage::model(GREETING)]);
    assert_eq!(chat.input(), "");
}

#[tokio::test]
async fn test_leaving_chat_discards_history() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());

    app.handle_key(key(KeyCode::Enter));
    type_text(&mut app, "Who was Basavanna?");
    app.handle_key(key(KeyCode::Enter));
    settle(&mut app).await;
    assert_eq!(history_len(&app), 3);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.screen(), Screen::Intro);
    assert!(app.chat().is_none());

    app.handle_key(key(KeyCode::Char('c')));
    assert_eq!(app.screen(), Screen::Chat);
    assert_eq!(history_len(&app), 1);
}

#[tokio::test]
async fn test_quit_keys() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());
    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.is_running());

    // 'q' is ordinary text on the chat screen; Ctrl+C quits anywhere
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.is_running());
    assert_eq!(app.chat().unwrap().input(), "q");
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(!app.is_running());
}

// ============================================================================
// Chat input
// ============================================================================

#[tokio::test]
async fn test_blank_enter_keeps_input() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));

    let chat = app.chat().unwrap();
    assert_eq!(chat.input(), "   ");
    assert!(!chat.can_send());
    assert_eq!(history_len(&app), 1);
    assert!(!is_loading(&app));
}

#[tokio::test]
async fn test_submit_clears_input_and_shows_reply() {
    let provider = MockProvider::gated();
    let mut app = App::new(provider.clone(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    type_text(&mut app, "What is Kayaka?");
    assert!(app.chat().unwrap().can_send());
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.chat().unwrap().input(), "");
    assert_eq!(history_len(&app), 2);
    assert!(is_loading(&app));

    // Input is disabled while the reply is outstanding
    type_text(&mut app, "more");
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.chat().unwrap().input(), "");
    assert_eq!(history_len(&app), 2);

    provider.release();
    settle(&mut app).await;

    let messages = app.chat().unwrap().session().messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].text().contains("What is Kayaka?"));
    assert!(app.chat().unwrap().transcript().is_at_bottom());
}

#[tokio::test]
async fn test_backspace_edits_input() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    type_text(&mut app, "Dasohax");
    app.handle_key(key(KeyCode::Backspace));

    assert_eq!(app.chat().unwrap().input(), "Dasoha");
}

#[tokio::test]
async fn test_init_failure_keeps_input_and_sends_nothing() {
    let mut app = App::new(Arc::new(NoKeyProvider), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    let chat = app.chat().unwrap();
    assert!(chat.session().messages().is_empty());
    assert_eq!(chat.session().error(), Some(INIT_ERROR_MESSAGE));

    type_text(&mut app, "hello?");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.chat().unwrap().input(), "hello?");
    assert_eq!(history_len(&app), 0);
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_intro() {
    let mut app = App::new(MockProvider::instant(), SessionConfig::default());

    let text = render_text(&mut app, 100, 40);

    assert!(text.contains(TITLE));
    assert!(text.contains(CALL_TO_ACTION));
    assert!(text.contains("Introduction"));
}

#[tokio::test]
async fn test_render_chat_with_indicator() {
    let provider = MockProvider::gated();
    let mut app = App::new(provider.clone(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    let idle = render_text(&mut app, 120, 30);
    assert!(idle.contains(HEADER_TITLE));
    assert!(idle.contains("Greetings!"));
    assert!(idle.contains(PLACEHOLDER));
    assert!(!idle.contains("●"));

    type_text(&mut app, "Tell me about the Anubhava Mantapa");
    app.handle_key(key(KeyCode::Enter));

    let waiting = render_text(&mut app, 120, 30);
    assert!(waiting.contains("You: Tell me about the Anubhava Mantapa"));
    assert!(waiting.contains("●"));

    provider.release();
    settle(&mut app).await;
}

#[tokio::test]
async fn test_render_error_banner() {
    let mut app = App::new(Arc::new(NoKeyProvider), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    let text = render_text(&mut app, 120, 20);

    assert!(text.contains("Failed to initialize the chatbot."));
}

#[tokio::test]
async fn test_reply_scrolls_back_to_newest() {
    let provider = MockProvider::gated();
    let mut app = App::new(provider.clone(), SessionConfig::default());
    app.handle_key(key(KeyCode::Enter));

    for question in ["Who was Basavanna?", "What is Kayaka?", "And Dasoha?"] {
        type_text(&mut app, question);
        app.handle_key(key(KeyCode::Enter));
        provider.release();
        settle(&mut app).await;
    }

    type_text(&mut app, "What was the Anubhava Mantapa?");
    app.handle_key(key(KeyCode::Enter));
    assert!(is_loading(&app));

    // Small screen so the history overflows the transcript area
    render_text(&mut app, 60, 12);
    app.handle_key(key(KeyCode::PageUp));
    assert!(!app.chat().unwrap().transcript().is_at_bottom());

    provider.release();
    settle(&mut app).await;

    assert_eq!(history_len(&app), 9);
    assert!(app.chat().unwrap().transcript().is_at_bottom());
}
