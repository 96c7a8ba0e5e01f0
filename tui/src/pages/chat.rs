//! Chat window and the chat demo page

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use desk_core::{Desk, DeskApi, Page};

use crate::theme;
use crate::ui_state::UiState;
use crate::widgets::Transcript;

const INPUT_PLACEHOLDER: &str = "Type your message...";

/// Demo page sections: title and bullet points
const HIGHLIGHTS: [(&str, [&str; 4]); 3] = [
    (
        "Intelligent Responses",
        [
            "Natural language processing",
            "Context-aware responses",
            "Continuous learning",
            "Multi-topic support",
        ],
    ),
    (
        "Lightning Fast",
        [
            "Sub-second response time",
            "Real-time processing",
            "Scalable architecture",
            "24/7 availability",
        ],
    ),
    (
        "Seamless Integration",
        [
            "Terminal-first design",
            "Cross-platform compatibility",
            "Easy integration",
            "Customizable appearance",
        ],
    ),
];

/// The chat demo page: highlights on the left, the session on the right
pub fn render_page<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    desk: &Desk<A>,
    ui: &mut UiState,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(Page::ChatDemo.title(), theme::heading())),
        Line::from(""),
    ];
    for (title, bullets) in HIGHLIGHTS {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(bullets.iter().map(|b| Line::from(format!("  • {b}"))));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled("Try asking:", theme::hint())));
    lines.push(Line::from("  \"What services do you offer?\""));
    lines.push(Line::from(Span::styled("Or ask about:", theme::hint())));
    lines.push(Line::from("  \"How can I get help?\""));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::RIGHT).border_style(theme::border(false))),
        columns[0],
    );

    render_panel(frame, columns[1], desk, ui);
}

/// The chat session in a bordered panel with its input line
pub fn render_panel<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    desk: &Desk<A>,
    ui: &mut UiState,
) {
    let Some(chat) = desk.chat() else {
        return;
    };
    let settings = desk.settings().saved();
    let accent = theme::parse_hex(&settings.primary_color);

    let status = if chat.is_typing() { "Typing" } else { "Online" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" {} ", settings.bot_name),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(format!(" {status} "), theme::hint()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    let transcript = Transcript::new(chat.messages())
        .bot_name(&settings.bot_name)
        .typing(settings.typing_indicator && chat.is_typing())
        .accent(accent);
    frame.render_stateful_widget(transcript, rows[0], &mut ui.transcript);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(true));
    let input_inner = input_block.inner(rows[1]);
    let input = if ui.chat_input.is_empty() {
        Paragraph::new(Span::styled(INPUT_PLACEHOLDER, theme::hint()))
    } else {
        // Keep the end of long input visible
        let visible = tail_fitting(&ui.chat_input, input_inner.width.saturating_sub(1) as usize);
        Paragraph::new(visible)
    };
    frame.render_widget(input.block(input_block), rows[1]);

    let cursor_x = ui.chat_input.width().min(input_inner.width.saturating_sub(1) as usize);
    frame.set_cursor_position((input_inner.x + cursor_x as u16, input_inner.y));
}

/// The longest suffix of `text` at most `width` columns wide
fn tail_fitting(text: &str, width: usize) -> &str {
    let mut start = text.len();
    let mut used = 0;
    for (index, c) in text.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = index;
    }
    &text[start..]
}
