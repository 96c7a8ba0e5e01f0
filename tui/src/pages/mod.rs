//! Page Rendering
//!
//! Every frame is a header line, the page body and a footer of key hints.
//! The chat window and toasts float above the body.

pub mod admin;
pub mod chat;
pub mod dashboard;
pub mod knowledge;
pub mod landing;
pub mod login;
pub mod not_found;
pub mod settings;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use desk_core::{Desk, DeskApi, Page};

use crate::display::DisplayState;
use crate::theme;
use crate::ui_state::UiState;

/// Floating chat window size limits
const CHAT_WINDOW_WIDTH: u16 = 48;
const CHAT_WINDOW_HEIGHT: u16 = 22;

/// Toast box width
const TOAST_WIDTH: u16 = 44;

/// Draw one frame
pub fn draw<A: DeskApi + 'static>(
    frame: &mut Frame,
    desk: &Desk<A>,
    display: &DisplayState,
    ui: &mut UiState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], desk.page(), display);

    let body = chunks[1];
    let page = desk.page();
    match page {
        Page::Landing => landing::render(frame, body),
        Page::ChatDemo => chat::render_page(frame, body, desk, ui),
        Page::Login => login::render(frame, body, ui),
        Page::Dashboard => {
            let content = admin::render_shell(frame, body, page, display);
            dashboard::render(frame, content);
        }
        Page::KnowledgeBase => {
            let content = admin::render_shell(frame, body, page, display);
            knowledge::render(frame, content, desk.knowledge(), ui);
        }
        Page::Settings => {
            let content = admin::render_shell(frame, body, page, display);
            settings::render(frame, content, desk.settings(), ui);
        }
        Page::NotFound => not_found::render(frame, body, &display.path),
    }

    // The chat page shows the session in its body instead
    if display.chat_open && page != Page::ChatDemo {
        let window = chat_window_area(body);
        frame.render_widget(Clear, window);
        chat::render_panel(frame, window, desk, ui);
    }

    render_toasts(frame, body, display);
    render_footer(frame, chunks[2], page, display);
}

/// Bottom-right corner of `area`
fn chat_window_area(area: Rect) -> Rect {
    let width = CHAT_WINDOW_WIDTH.min(area.width.saturating_sub(2));
    let height = CHAT_WINDOW_HEIGHT.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height),
        width,
        height,
    )
}

fn render_header(frame: &mut Frame, area: Rect, page: Page, display: &DisplayState) {
    let who = match (display.authenticated, display.email.as_deref()) {
        (true, Some(email)) => format!("Signed in as {email}"),
        _ => "Not signed in".to_string(),
    };
    let left = Line::from(vec![
        Span::styled(" botdesk ", theme::heading()),
        Span::styled("│ ", theme::hint()),
        Span::raw(page.title()),
    ]);
    frame.render_widget(Paragraph::new(left), area);
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{who} "), theme::hint()))
            .alignment(ratatui::layout::Alignment::Right),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, page: Page, display: &DisplayState) {
    let hints = if display.chat_open && page != Page::ChatDemo {
        "Enter send · PgUp/PgDn scroll · Esc close chat · Ctrl+C quit"
    } else {
        match page {
            Page::Landing => "c chat demo · a admin panel · F4 chat · q quit",
            Page::ChatDemo => "Enter send · PgUp/PgDn scroll · Esc home · Ctrl+C quit",
            Page::Login => "Tab switch field · Enter sign in · Esc home · Ctrl+C quit",
            Page::Dashboard => "F1-F3 pages · F4 chat · F9 sign out · Esc home · Ctrl+C quit",
            Page::KnowledgeBase => {
                "Tab panel · Enter add/upload · Del remove · r refresh · F1-F3 pages · F9 sign out"
            }
            Page::Settings => {
                "↑/↓ field · type to edit · Space toggle · Ctrl+S save · Ctrl+R reset · F1-F3 pages"
            }
            Page::NotFound => "Enter home · Ctrl+C quit",
        }
    };
    frame.render_widget(Paragraph::new(Span::styled(hints, theme::hint())), area);
}

fn render_toasts(frame: &mut Frame, area: Rect, display: &DisplayState) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y;
    for toast in display.toasts.iter().rev() {
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let lines = textwrap::wrap(&toast.message, inner_width).len() as u16;
        let height = lines + 2;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, height);
        let color = theme::notify_color(toast.level);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        if let Some(title) = &toast.title {
            block = block.title(Span::styled(
                format!(" {title} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
        y += height;
    }
}

/// A centered rect of at most `width` x `height` inside `area`
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
