//! Admin shell: sidebar navigation around the admin pages

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use desk_core::Page;

use crate::display::DisplayState;
use crate::theme;

const SIDEBAR_WIDTH: u16 = 26;

/// Draw the sidebar and return the content area
pub fn render_shell(frame: &mut Frame, area: Rect, current: Page, display: &DisplayState) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled("AI Assistant", theme::heading())),
        Line::from(Span::styled("Admin Panel", theme::hint())),
        Line::from(""),
    ];
    for (index, page) in Page::ADMIN_NAV.iter().enumerate() {
        let label = format!("F{} {}", index + 1, page.title());
        let line = if *page == current {
            Line::from(Span::styled(
                format!("▶ {label}"),
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(format!("  {label}"))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Administrator", theme::hint())));
    if let Some(email) = &display.email {
        lines.push(Line::from(email.as_str()));
    }
    lines.push(Line::from(Span::styled("F9 Sign out", theme::hint())));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(theme::border(false)),
        ),
        columns[0],
    );

    columns[1].inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 0,
    })
}
