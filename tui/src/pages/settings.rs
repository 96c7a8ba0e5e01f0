//! Settings page

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use desk_core::{FieldValue, Page, SettingsField, SettingsForm};

use crate::theme;
use crate::ui_state::UiState;

pub fn render(frame: &mut Frame, area: Rect, form: &SettingsForm, ui: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let state = if form.is_saving() {
        Span::styled("Saving...", Style::default().fg(theme::WARNING_AMBER))
    } else if form.is_dirty() {
        Span::styled("Unsaved changes", Style::default().fg(theme::WARNING_AMBER))
    } else {
        Span::styled("All changes saved", theme::hint())
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(Page::Settings.title(), theme::heading())),
            Line::from(state),
        ]),
        rows[0],
    );

    let selected = ui.settings_field();
    let mut lines = Vec::new();
    let mut section = "";
    for field in SettingsField::ALL {
        if field.section() != section {
            section = field.section();
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(section, theme::heading())));
        }

        let focused = field == selected;
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let value = match form.value(field) {
            FieldValue::Text(text) if focused => format!("{text}_"),
            FieldValue::Text(text) => text.to_string(),
            FieldValue::Toggle(true) => "[on]".to_string(),
            FieldValue::Toggle(false) => "[off]".to_string(),
        };

        let mut spans = vec![
            Span::styled(format!("{marker}{:<22}", field.label()), label_style),
            Span::raw(value),
        ];
        if field == SettingsField::PrimaryColor {
            if let FieldValue::Text(color) = form.value(field) {
                spans.push(Span::styled("  ■", Style::default().fg(theme::parse_hex(color))));
            }
        }
        lines.push(Line::from(spans));
        if let Some(hint) = field.hint() {
            lines.push(Line::from(Span::styled(format!("    {hint}"), theme::hint())));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border(true)),
        ),
        rows[1],
    );
}
