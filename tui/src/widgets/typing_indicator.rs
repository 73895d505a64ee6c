//! Typing Indicator
//!
//! Three dots that pulse one after another while a reply is outstanding.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::{AMBER, AMBER_SOFT, DOT_GRAY};
use crate::widgets::transcript::MODEL_LABEL;

/// Frames each dot stays lit
const FRAMES_PER_DOT: usize = 2;

/// Dot glyph
const DOT: &str = "●";

/// Animation state for the indicator
#[derive(Debug, Default, Clone)]
pub struct TypingIndicator {
    frame: usize,
}

impl TypingIndicator {
    /// Create an indicator at its first frame
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame
    pub fn advance(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    /// Restart from the first dot
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Index of the lit dot (0..3)
    #[must_use]
    pub fn active_dot(&self) -> usize {
        (self.frame / FRAMES_PER_DOT) % 3
    }

    /// The indicator as a transcript line, labelled like a model turn
    #[must_use]
    pub fn line(&self) -> Line<'static> {
        let lit = self.active_dot();
        let mut spans = vec![Span::styled(MODEL_LABEL, Style::default().fg(AMBER))];
        for i in 0..3 {
            let style = if i == lit {
                Style::default().fg(AMBER_SOFT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DOT_GRAY).add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled(DOT, style));
            if i < 2 {
                spans.push(Span::raw(" "));
            }
        }
        Line::from(spans)
    }
}
