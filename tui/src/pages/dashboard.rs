//! Dashboard page

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use desk_core::dashboard::{
    ServiceHealth, RECENT_CONVERSATIONS, SERVICES, STATS, SUBTITLE, TITLE,
};

use crate::theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(TITLE, theme::heading())),
            Line::from(Span::styled(SUBTITLE, theme::hint())),
        ]),
        rows[0],
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    for (stat, rect) in STATS.iter().zip(cards.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                stat.value,
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(stat.description, theme::hint())),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::border(false))
                    .title(format!(" {} ", stat.title)),
            ),
            *rect,
        );
    }

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let mut conversations = Vec::new();
    for convo in &RECENT_CONVERSATIONS {
        conversations.push(Line::from(vec![
            Span::styled(convo.user, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", convo.time), theme::hint()),
        ]));
        conversations.push(Line::from(format!("  {}", convo.message)));
    }
    frame.render_widget(
        Paragraph::new(conversations).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(false))
                .title(" Recent Conversations "),
        ),
        lower[0],
    );

    let services: Vec<Line> = SERVICES
        .iter()
        .map(|status| {
            let color = match status.health {
                ServiceHealth::Operational => theme::SUCCESS_GREEN,
                ServiceHealth::Processing => theme::WARNING_AMBER,
            };
            Line::from(vec![
                Span::raw(format!("{:<20}", status.service)),
                Span::styled(status.health.label(), Style::default().fg(color)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(services).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(false))
                .title(" System Status "),
        ),
        lower[1],
    );
}
