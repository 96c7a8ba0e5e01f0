//! Login page

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use desk_core::Page;

use super::centered;
use crate::theme;
use crate::ui_state::{LoginField, UiState};

const FORM_WIDTH: u16 = 50;
const FORM_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, area: Rect, ui: &UiState) {
    let form = centered(area, FORM_WIDTH, FORM_HEIGHT);
    frame.render_widget(Clear, form);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(true))
        .title(Span::styled(format!(" {} ", Page::Login.title()), theme::heading()));
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Sign in to manage your AI chatbot",
            theme::hint(),
        ))),
        rows[0],
    );

    let masked = "•".repeat(ui.login_password.chars().count());
    let fields = [
        (LoginField::Email, "Email", ui.login_email.as_str(), "admin@example.com", rows[1]),
        (LoginField::Password, "Password", masked.as_str(), "password", rows[2]),
    ];
    for (field, label, value, placeholder, rect) in fields {
        let focused = ui.login_focus == field;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border(focused))
            .title(format!(" {label} "));
        let text = if value.is_empty() {
            Span::styled(placeholder, theme::hint())
        } else {
            Span::raw(value)
        };
        let field_inner = block.inner(rect);
        frame.render_widget(Paragraph::new(text).block(block), rect);
        if focused {
            let x = value.width().min(field_inner.width.saturating_sub(1) as usize) as u16;
            frame.set_cursor_position((field_inner.x + x, field_inner.y));
        }
    }
}
