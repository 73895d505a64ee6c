//! Theme and Colors
//!
//! Warm amber-to-orange accents over neutral text, with a blue tint for
//! the user's own turns.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Accent Palette
// ============================================================================

/// Primary accent - amber
pub const AMBER: Color = Color::Rgb(245, 158, 11);

/// Secondary accent - deep orange (end of the title gradient)
pub const ORANGE: Color = Color::Rgb(234, 88, 12);

/// Soft amber for bullets and highlights
pub const AMBER_SOFT: Color = Color::Rgb(252, 211, 77);

// ============================================================================
// Conversation Colors
// ============================================================================

/// User turns
pub const USER_BLUE: Color = Color::Rgb(96, 165, 250);

/// Model turns
pub const MODEL_TEXT: Color = Color::Rgb(229, 231, 235);

/// Typing indicator dots
pub const DOT_GRAY: Color = Color::Rgb(156, 163, 175);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Disabled controls
pub const DISABLED_GRAY: Color = Color::Rgb(75, 85, 99);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Bold amber, used for titles and the call to action
#[must_use]
pub fn accent() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Dimmed helper text
#[must_use]
pub fn hint() -> Style {
    Style::default().fg(DIM_GRAY)
}
