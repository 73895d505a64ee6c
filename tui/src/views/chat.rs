//! Chat View
//!
//! The conversation screen. Owns exactly one [`ConversationSession`] for as
//! long as it is mounted, plus the input line and transcript scroll state.
//!
//! Layout, top to bottom:
//!
//! ```text
//! ← Esc                 Basavanna Chatbot
//! ─────────────────────────────────────────
//! transcript (newest at the bottom)
//! Basavanna Bot: ● ● ●          (while a reply is outstanding)
//! error banner                   (when set)
//! ╭───────────────────────────────────────╮
//! │ Ask a question...       [Enter ➤ Send]│
//! ╰───────────────────────────────────────╯
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use basava_core::{ChatProvider, ConversationSession, SessionConfig, Submission};

use crate::theme::{self, AMBER, DISABLED_GRAY, ERROR_RED, MODEL_TEXT};
use crate::views::ViewAction;
use crate::widgets::{Transcript, TranscriptState, TypingIndicator};

/// Header text
pub const HEADER_TITLE: &str = "Basavanna Chatbot";

/// Shown in the empty input box
pub const PLACEHOLDER: &str = "Ask a question...";

/// Send affordance
const SEND_HINT: &str = "[Enter ➤ Send]";

/// Input box height including borders
const INPUT_HEIGHT: u16 = 3;

/// The conversation screen
pub struct ChatView {
    /// Session owned by this mount
    session: ConversationSession,
    /// Text being composed
    input: String,
    /// Transcript scroll position
    transcript: TranscriptState,
    /// Pulsing dots for the pending reply
    indicator: TypingIndicator,
    /// History length at the last scroll-follow check
    seen_messages: usize,
}

impl ChatView {
    /// Mount the view, opening a fresh session
    pub fn new(provider: &dyn ChatProvider, config: &SessionConfig) -> Self {
        let session = ConversationSession::initialize(provider, config);
        let seen_messages = session.messages().len();
        Self {
            session,
            input: String::new(),
            transcript: TranscriptState::default(),
            indicator: TypingIndicator::new(),
            seen_messages,
        }
    }

    /// The session behind this view
    #[must_use]
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Current input text
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Transcript scroll state
    #[must_use]
    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    /// Whether the send affordance is enabled
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.session.can_submit(&self.input)
    }

    /// Submit the input line; it is cleared only if the turn was sent
    pub fn submit(&mut self) -> Submission {
        let submission = self.session.submit(&self.input);
        if submission == Submission::Sent {
            self.input.clear();
            self.indicator.reset();
        }
        self.follow_history();
        submission
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        let loading = self.session.is_loading();

        match key.code {
            KeyCode::Esc => return ViewAction::NavigateToIntro,

            KeyCode::Enter => {
                self.submit();
            }

            // Input is disabled while a reply is outstanding
            KeyCode::Char(c)
                if !loading
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c);
            }
            KeyCode::Backspace if !loading => {
                self.input.pop();
            }

            KeyCode::PageUp => {
                let page = self.transcript.page_size();
                self.transcript.scroll_up(page);
            }
            KeyCode::PageDown => {
                let page = self.transcript.page_size();
                self.transcript.scroll_down(page);
            }
            KeyCode::Up => self.transcript.scroll_up(1),
            KeyCode::Down => self.transcript.scroll_down(1),
            KeyCode::End => self.transcript.scroll_to_bottom(),

            _ => {}
        }

        ViewAction::None
    }

    /// Per-frame work: collect a finished reply and animate the indicator
    ///
    /// Returns true if the history changed.
    pub fn tick(&mut self) -> bool {
        let changed = self.session.poll_reply();
        if self.session.is_loading() {
            self.indicator.advance();
        }
        self.follow_history();
        changed
    }

    /// Jump to the newest message whenever the history grows
    fn follow_history(&mut self) {
        let len = self.session.messages().len();
        if len != self.seen_messages {
            self.seen_messages = len;
            self.transcript.scroll_to_bottom();
        }
    }

    /// Draw the view into `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let banner_height = u16::from(self.session.error().is_some());
        let [header, transcript, banner, input] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(banner_height),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_transcript(frame, transcript);
        if let Some(error) = self.session.error() {
            let text = Line::styled(
                format!("⚠ {error}"),
                Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
            );
            frame.render_widget(Paragraph::new(text), banner);
        }
        self.render_input(frame, input);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(DISABLED_GRAY));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        frame.render_widget(
            Paragraph::new(Line::styled(HEADER_TITLE, theme::accent()))
                .alignment(Alignment::Center),
            inner,
        );
        frame.render_widget(Paragraph::new(Line::styled("← Esc", theme::hint())), inner);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let pending = self.session.is_loading().then(|| self.indicator.line());
        let widget = Transcript::new(self.session.messages()).pending(pending);
        frame.render_stateful_widget(widget, area, &mut self.transcript);

        if !self.transcript.is_at_bottom() && area.height > 0 {
            let marker = format!(" ↓ {} more (End) ", self.transcript.scroll_offset());
            let width = (marker.width() as u16).min(area.width);
            let x = area.x + area.width.saturating_sub(width);
            let y = area.y + area.height - 1;
            frame.render_widget(
                Paragraph::new(Line::styled(marker, Style::default().fg(AMBER))),
                Rect::new(x, y, width, 1),
            );
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let loading = self.session.is_loading();
        let border = if loading { DISABLED_GRAY } else { AMBER };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let hint_style = if self.can_send() {
            theme::accent()
        } else {
            Style::default().fg(DISABLED_GRAY)
        };
        let hint_width = (SEND_HINT.width() as u16 + 1).min(inner.width);
        let [text_area, hint_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(hint_width)]).areas(inner);

        frame.render_widget(
            Paragraph::new(Line::styled(SEND_HINT, hint_style)).alignment(Alignment::Right),
            hint_area,
        );

        if self.input.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::styled(PLACEHOLDER, theme::hint())),
                text_area,
            );
            if !loading {
                frame.set_cursor_position((text_area.x, text_area.y));
            }
            return;
        }

        let visible = tail_fitting(&self.input, text_area.width.saturating_sub(1) as usize);
        let style = if loading {
            Style::default().fg(DISABLED_GRAY)
        } else {
            Style::default().fg(MODEL_TEXT)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(visible, style))).wrap(Wrap { trim: false }),
            text_area,
        );
        if !loading {
            let cursor_x = text_area.x + visible.width() as u16;
            frame.set_cursor_position((cursor_x, text_area.y));
        }
    }
}

impl std::fmt::Debug for ChatView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatView")
            .field("session", &self.session)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

/// Longest suffix of `text` whose display width fits in `width` columns
fn tail_fitting(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, ch) in text.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}
