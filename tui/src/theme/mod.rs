//! Theme and Colors
//!
//! Botdesk's palette: a cyan accent on dark panels, matching the default
//! chatbot primary color.

use ratatui::style::{Color, Modifier, Style};

use desk_core::NotifyLevel;

// ============================================================================
// Brand
// ============================================================================

/// Accent - the default chatbot primary color (#00FFFF)
pub const ACCENT: Color = Color::Rgb(0, 255, 255);

/// Dimmed accent for borders
pub const ACCENT_DIM: Color = Color::Rgb(0, 150, 160);

/// Panel background
pub const PANEL: Color = Color::Rgb(24, 28, 36);

// ============================================================================
// Chat
// ============================================================================

/// Bot bubble text
pub const BOT_TEXT: Color = Color::Rgb(200, 240, 255);

/// User bubble text
pub const USER_TEXT: Color = Color::Rgb(130, 220, 130);

/// Timestamps and hints
pub const DIM_GRAY: Color = Color::Rgb(110, 110, 110);

// ============================================================================
// Status
// ============================================================================

/// Errors
pub const ERROR_RED: Color = Color::Rgb(255, 90, 90);

/// Success
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Warnings and in-progress states
pub const WARNING_AMBER: Color = Color::Rgb(255, 200, 90);

/// Informational
pub const INFO_BLUE: Color = Color::Rgb(120, 170, 255);

/// Color for a notice level
pub fn notify_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => INFO_BLUE,
        NotifyLevel::Success => SUCCESS_GREEN,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
    }
}

/// Title style for page headings
pub fn heading() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Border style, brighter when the panel has focus
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(ACCENT_DIM)
    }
}

/// Hint text
pub fn hint() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Parse a `#RRGGBB` string, falling back to the accent
pub fn parse_hex(color: &str) -> Color {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return ACCENT;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => ACCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#00FFFF"), Color::Rgb(0, 255, 255));
        assert_eq!(parse_hex("#1a2b3c"), Color::Rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(parse_hex("teal"), ACCENT);
        assert_eq!(parse_hex("#zzzzzz"), ACCENT);
    }
}
