//! Landing page

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use desk_core::Page;

use crate::theme;

const TAGLINE: &str = "Upload documents, manage knowledge sources, and chat with an AI \
                       assistant grounded in your own content.";

/// Feature cards: title and bullet points
const FEATURES: [(&str, [&str; 4]); 3] = [
    (
        "Knowledge Base",
        [
            "Document uploads",
            "YouTube video processing",
            "Real-time indexing status",
            "Content management tools",
        ],
    ),
    (
        "Smart Chat Widget",
        [
            "Floating chat window",
            "Typing indicators",
            "Works in any terminal size",
            "Customizable themes",
        ],
    ),
    (
        "Admin Dashboard",
        [
            "Real-time analytics",
            "Conversation monitoring",
            "System health status",
            "Customization options",
        ],
    ),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let hero = vec![
        Line::from(Span::styled(Page::Landing.title(), theme::heading())),
        Line::from(""),
        Line::from(TAGLINE),
        Line::from(Span::styled(
            "Press c to try the chat demo, a to open the admin panel.",
            theme::hint(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(hero)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);

    for ((title, bullets), column) in FEATURES.iter().zip(columns.iter()) {
        let lines: Vec<Line> = bullets
            .iter()
            .map(|b| Line::from(format!("• {b}")))
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border(false))
                    .title(Span::styled(format!(" {title} "), Style::default().fg(theme::ACCENT))),
            ),
            *column,
        );
    }
}
