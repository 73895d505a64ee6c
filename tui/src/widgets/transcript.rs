//! Transcript Widget
//!
//! A borderless, bottom-anchored, scrollable view of the conversation.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

use basava_core::{ChatMessage, MessageRole};

use crate::theme::{AMBER, DIM_GRAY, MODEL_TEXT, USER_BLUE};

/// Label shown before user turns
pub const USER_LABEL: &str = "You: ";

/// Label shown before model turns
pub const MODEL_LABEL: &str = "Basavanna Bot: ";

/// Scroll state for a transcript
#[derive(Debug, Default)]
pub struct TranscriptState {
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total content lines at the last render
    total_lines: usize,
    /// Visible height at the last render
    viewport: usize,
}

impl TranscriptState {
    /// Lines scrolled up from the newest message
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Whether the newest line is in view
    #[must_use]
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_offset == 0
    }

    /// Half a viewport, at least one line
    #[must_use]
    pub fn page_size(&self) -> usize {
        (self.viewport / 2).max(1)
    }

    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.total_lines.saturating_sub(self.viewport);
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// The conversation, newest at the bottom
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    pending: Option<Line<'a>>,
}

impl<'a> Transcript<'a> {
    /// Create a transcript over a message history
    #[must_use]
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            pending: None,
        }
    }

    /// Line shown as the not-yet-resolved model turn
    #[must_use]
    pub fn pending(mut self, line: Option<Line<'a>>) -> Self {
        self.pending = line;
        self
    }

    fn wrapped_lines(&self, width: usize) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        for msg in self.messages {
            let (label, style) = match msg.role() {
                MessageRole::User => (USER_LABEL, Style::default().fg(USER_BLUE)),
                MessageRole::Model => (MODEL_LABEL, Style::default().fg(MODEL_TEXT)),
            };

            let content = format!("{label}{}", msg.text());
            for (i, line) in content.lines().enumerate() {
                if line.is_empty() {
                    lines.push(Line::default());
                    continue;
                }
                for (j, piece) in wrap(line, width).into_iter().enumerate() {
                    let piece = piece.into_owned();
                    // Label gets the role accent; the rest keeps the body style
                    if i == 0 && j == 0 && piece.starts_with(label) {
                        let body = piece[label.len()..].to_string();
                        lines.push(Line::from(vec![
                            Span::styled(label, label_style(msg.role())),
                            Span::styled(body, style),
                        ]));
                    } else {
                        lines.push(Line::styled(piece, style));
                    }
                }
            }
            lines.push(Line::default());
        }

        if let Some(pending) = &self.pending {
            lines.push(pending.clone());
        }

        lines
    }
}

fn label_style(role: MessageRole) -> Style {
    match role {
        MessageRole::User => Style::default().fg(USER_BLUE),
        MessageRole::Model => Style::default().fg(AMBER),
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width < 4 || area.height == 0 {
            return;
        }

        let lines = self.wrapped_lines(area.width as usize);
        let height = area.height as usize;

        state.total_lines = lines.len();
        state.viewport = height;

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        // Bottom-anchored visible range
        let visible_end = state.total_lines.saturating_sub(state.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let has_content_above = visible_start > 0;
        let has_content_below = state.scroll_offset > 0;

        let visible = &lines[visible_start..visible_end];
        for (i, line) in visible.iter().enumerate() {
            let y = area.y + i as u16;
            let fade = (has_content_above && i == 0)
                || (has_content_below && i + 1 == visible.len());
            if fade {
                let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                let dimmed = Line::styled(text, Style::default().fg(DIM_GRAY));
                buf.set_line(area.x, y, &dimmed, area.width);
            } else {
                buf.set_line(area.x, y, line, area.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_strings(
        messages: &[ChatMessage],
        width: u16,
        height: u16,
        state: &mut TranscriptState,
    ) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        Transcript::new(messages).render(area, &mut buf, state);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_labels_and_spacing() {
        let messages = vec![ChatMessage::model("Hello"), ChatMessage::user("Hi")];
        let mut state = TranscriptState::default();

        let rows = render_to_strings(&messages, 40, 4, &mut state);

        assert_eq!(rows[0], "Basavanna Bot: Hello");
        assert_eq!(rows[1], "");
        assert_eq!(rows[2], "You: Hi");
        assert_eq!(state.total_lines, 4);
    }

    #[test]
    fn test_bottom_anchored() {
        let messages: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("line {i}")))
            .collect();
        let mut state = TranscriptState::default();

        let rows = render_to_strings(&messages, 20, 3, &mut state);

        // Last message sits just above its trailing blank line
        assert_eq!(rows[1], "You: line 9");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let messages: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("line {i}")))
            .collect();
        let mut state = TranscriptState::default();
        render_to_strings(&messages, 20, 4, &mut state);

        state.scroll_up(1000);
        assert_eq!(state.scroll_offset(), 20 - 4);

        state.scroll_down(3);
        assert_eq!(state.scroll_offset(), 13);

        state.scroll_to_bottom();
        assert!(state.is_at_bottom());
    }

    #[test]
    fn test_clipped_edge_uses_dim_gray() {
        let messages: Vec<ChatMessage> = (0..10)
            .map(|i| ChatMessage::user(format!("line {i}")))
            .collect();
        let mut state = TranscriptState::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);

        Transcript::new(&messages).render(area, &mut buf, &mut state);

        // Top row has history above it; the newest message does not fade
        assert_eq!(buf[(0, 0)].fg, DIM_GRAY);
        assert_eq!(buf[(0, 2)].symbol(), "Y");
        assert_ne!(buf[(0, 2)].fg, DIM_GRAY);
    }

    #[test]
    fn test_multiline_message_wraps() {
        let messages = vec![ChatMessage::model("first\n\nsecond paragraph here")];
        let mut state = TranscriptState::default();

        let rows = render_to_strings(&messages, 30, 6, &mut state);

        assert_eq!(rows[0], "Basavanna Bot: first");
        assert_eq!(rows[1], "");
        assert_eq!(rows[2], "second paragraph here");
    }
}
