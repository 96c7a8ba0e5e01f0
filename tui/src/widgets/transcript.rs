//! Transcript Widget
//!
//! A borderless, scrollable chat transcript. Bot messages sit on the left,
//! user messages on the right, each under a sender/time header.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use desk_core::{Message, Sender};

use crate::theme::{BOT_TEXT, DIM_GRAY, USER_TEXT};

/// Share of the width a bubble may take
const BUBBLE_WIDTH_PERCENT: usize = 80;

/// Scroll state for a transcript
#[derive(Debug, Default)]
pub struct TranscriptState {
    /// Lines scrolled up from the bottom (0 = newest visible)
    pub offset: usize,
    /// Total rendered lines, set on render
    pub total_lines: usize,
}

impl TranscriptState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.total_lines.saturating_sub(1));
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Show the newest message
    pub fn scroll_to_latest(&mut self) {
        self.offset = 0;
    }
}

/// A rendered chat transcript
pub struct Transcript<'a> {
    messages: &'a [Message],
    bot_name: &'a str,
    typing: bool,
    accent: Color,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            bot_name: "Bot",
            typing: false,
            accent: BOT_TEXT,
        }
    }

    /// Name shown over bot messages
    pub fn bot_name(mut self, name: &'a str) -> Self {
        self.bot_name = name;
        self
    }

    /// Show the typing indicator after the last message
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    pub fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    fn lines(&self, width: usize) -> Vec<(String, Style, bool)> {
        let bubble = (width * BUBBLE_WIDTH_PERCENT / 100).max(1);
        let mut lines = Vec::new();

        for message in self.messages {
            let (who, style, right) = match message.sender {
                Sender::Bot => (self.bot_name, Style::default().fg(BOT_TEXT), false),
                Sender::User => ("You", Style::default().fg(USER_TEXT), true),
            };
            lines.push((
                format!("{who} · {}", message.time_label()),
                Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
                right,
            ));
            for text_line in message.text.lines() {
                if text_line.is_empty() {
                    lines.push((String::new(), style, right));
                    continue;
                }
                for wrapped in wrap(text_line, bubble) {
                    lines.push((wrapped.into_owned(), style, right));
                }
            }
            lines.push((String::new(), Style::default(), false));
        }

        if self.typing {
            lines.push((
                format!("{} is typing...", self.bot_name),
                Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
                false,
            ));
        }
        lines
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let width = area.width as usize;
        let height = area.height as usize;
        let lines = self.lines(width);

        state.total_lines = lines.len();
        let max_offset = state.total_lines.saturating_sub(height);
        state.offset = state.offset.min(max_offset);

        let end = state.total_lines - state.offset;
        let start = end.saturating_sub(height);

        for (row, (text, style, right)) in lines[start..end].iter().enumerate() {
            let text_width = text.width().min(width);
            let x = if *right {
                area.x + (width - text_width) as u16
            } else {
                area.x
            };
            buf.set_stringn(x, area.y + row as u16, text, width, *style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn test_user_messages_are_right_aligned() {
        let messages = vec![Message::bot("hi"), Message::user("yo")];
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let mut state = TranscriptState::default();

        Transcript::new(&messages).render(area, &mut buf, &mut state);

        // bot header, "hi", blank, user header, "yo", blank
        assert_eq!(state.total_lines, 6);
        assert!(row(&buf, 1).starts_with("hi"));
        assert!(row(&buf, 4).ends_with("yo"));
    }

    #[test]
    fn test_offset_is_clamped() {
        let messages = vec![Message::bot("one")];
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        let mut state = TranscriptState {
            offset: 50,
            total_lines: 0,
        };

        Transcript::new(&messages).render(area, &mut buf, &mut state);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_typing_indicator() {
        let messages = vec![Message::bot("one")];
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        let mut state = TranscriptState::default();

        Transcript::new(&messages)
            .bot_name("Helper")
            .typing(true)
            .render(area, &mut buf, &mut state);
        assert!(row(&buf, 2).starts_with("Helper is typing..."));
    }
}
