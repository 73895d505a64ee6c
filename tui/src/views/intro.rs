//! Intro View
//!
//! Static landing page: who Basavanna was, four lines on his impact, and a
//! prompt to start chatting.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

use crate::theme::{self, AMBER, AMBER_SOFT, MODEL_TEXT, ORANGE};
use crate::views::ViewAction;

/// Page title
pub const TITLE: &str = "The Vision of Basavanna";

/// One-line summary under the title
pub const SUBTITLE: &str =
    "A 12th-century philosopher and social reformer who reshaped Karnataka's society.";

/// Heading above the impact list
pub const IMPACTS_HEADING: &str = "Key Societal Impacts:";

/// The impact list
pub const IMPACT_POINTS: [&str; 4] = [
    "Promoted radical equality and sought to abolish caste barriers, advocating for one human family.",
    "Empowered women and common people through the Anubhava Mantapa, a pioneering spiritual and social parliament.",
    "Championed the dignity of labour through \"Kayaka\" (work is worship) and selfless service via \"Dasoha\" (communal sharing).",
    "Inspired countless social and spiritual movements, leaving a timeless legacy on Karnataka.",
];

/// Label of the button that opens the chat
pub const CALL_TO_ACTION: &str = "Ask About His Legacy";

const MAX_CARD_WIDTH: u16 = 90;

/// The landing page
#[derive(Debug, Default, Clone, Copy)]
pub struct IntroView;

impl IntroView {
    /// Create the view
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Map a key press to a navigation request
    #[must_use]
    pub fn handle_key(&self, key: KeyEvent) -> ViewAction {
        match key.code {
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('c' | 'C') => {
                ViewAction::NavigateToChat
            }
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => ViewAction::Quit,
            _ => ViewAction::None,
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default().fg(MODEL_TEXT).add_modifier(Modifier::BOLD);
        let body = Style::default().fg(MODEL_TEXT);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("The Vision of ", heading),
                Span::styled("Basava", Style::default().fg(AMBER).add_modifier(Modifier::BOLD)),
                Span::styled("nna", Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)),
            ])
            .alignment(Alignment::Center),
            Line::default(),
            Line::styled(SUBTITLE, theme::hint()).alignment(Alignment::Center),
            Line::default(),
            Line::styled(IMPACTS_HEADING, heading).alignment(Alignment::Center),
            Line::default(),
        ];

        for point in IMPACT_POINTS {
            lines.push(Line::from(vec![
                Span::styled("✦ ", Style::default().fg(AMBER_SOFT)),
                Span::styled(point, body),
            ]));
            lines.push(Line::default());
        }

        lines.push(
            Line::styled(
                format!("[ {CALL_TO_ACTION} → ]"),
                theme::accent().add_modifier(Modifier::REVERSED),
            )
            .alignment(Alignment::Center),
        );
        lines.push(Line::default());
        lines.push(
            Line::styled("Enter to start chatting · q to quit", theme::hint())
                .alignment(Alignment::Center),
        );

        lines
    }
}

impl Widget for &IntroView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [card] = Layout::horizontal([Constraint::Max(MAX_CARD_WIDTH)])
            .flex(Flex::Center)
            .areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(AMBER));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: true })
            .render(card, buf);
    }
}
