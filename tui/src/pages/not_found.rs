//! Not-found page

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use desk_core::Page;

use super::centered;
use crate::theme;

pub fn render(frame: &mut Frame, area: Rect, path: &str) {
    let lines = vec![
        Line::from(Span::styled("404", theme::heading())),
        Line::from(Page::NotFound.title()),
        Line::from(""),
        Line::from(Span::styled(format!("No page at {path}"), theme::hint())),
        Line::from(Span::styled("Press Enter to return home", theme::hint())),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        centered(area, 50, 5),
    );
}
