//! Knowledge-base page: upload draft on top, sources table below

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;

use desk_core::{DeskApi, IndexStatus, KnowledgeBase, Page};

use crate::pages::centered;
use crate::theme;
use crate::ui_state::{KnowledgeFocus, PendingDelete, UiState};

pub fn render<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    knowledge: &KnowledgeBase<A>,
    ui: &UiState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Min(4),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(Page::KnowledgeBase.title(), theme::heading()),
            Span::styled("  Add Knowledge Sources", theme::hint()),
        ])),
        rows[0],
    );

    render_path_input(frame, rows[1], ui);
    render_files(frame, rows[2], knowledge, ui);
    render_link(frame, rows[3], knowledge, ui);
    render_sources(frame, rows[4], knowledge, ui);

    if let Some(pending) = &ui.pending_delete {
        render_confirm_delete(frame, area, pending);
    }
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border(focused))
        .title(format!(" {title} "))
}

fn render_path_input(frame: &mut Frame, area: Rect, ui: &UiState) {
    let focused = ui.knowledge_focus == KnowledgeFocus::FilePath;
    let text = if ui.file_path.is_empty() {
        Span::styled("Path to a .pdf or .docx file, Enter to add", theme::hint())
    } else {
        Span::raw(ui.file_path.as_str())
    };
    frame.render_widget(
        Paragraph::new(text).block(panel("Upload Documents", focused)),
        area,
    );
}

fn render_files<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    knowledge: &KnowledgeBase<A>,
    ui: &UiState,
) {
    let focused = ui.knowledge_focus == KnowledgeFocus::Files;
    let files = knowledge.draft().files();
    let block = panel(&format!("Selected Files ({})", files.len()), focused);

    if files.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No files selected", theme::hint())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = files
        .iter()
        .map(|file| {
            ListItem::new(Line::from(vec![
                Span::raw(file.name.as_str()),
                Span::styled(format!("  {}", file.size_label()), theme::hint()),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    if focused {
        state.select(Some(ui.file_selected.min(files.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_link<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    knowledge: &KnowledgeBase<A>,
    ui: &UiState,
) {
    let focused = ui.knowledge_focus == KnowledgeFocus::Link;
    let link = if ui.link.is_empty() {
        Span::styled("https://www.youtube.com/watch?v=...", theme::hint())
    } else {
        Span::raw(ui.link.as_str())
    };
    let status = if knowledge.is_uploading() {
        Span::styled("Uploading and indexing...", Style::default().fg(theme::WARNING_AMBER))
    } else if let Some(warning) = knowledge.draft().link_warning() {
        Span::styled(warning, Style::default().fg(theme::WARNING_AMBER))
    } else {
        Span::styled("Enter or Ctrl+U to upload", theme::hint())
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(link), Line::from(status)])
            .block(panel("YouTube Link", focused)),
        area,
    );
}

fn status_style(status: IndexStatus) -> Style {
    let color = match status {
        IndexStatus::Indexed => theme::SUCCESS_GREEN,
        IndexStatus::Processing => theme::WARNING_AMBER,
        IndexStatus::Error => theme::ERROR_RED,
    };
    Style::default().fg(color)
}

fn render_sources<A: DeskApi + 'static>(
    frame: &mut Frame,
    area: Rect,
    knowledge: &KnowledgeBase<A>,
    ui: &UiState,
) {
    let focused = ui.knowledge_focus == KnowledgeFocus::Sources;
    let title = if knowledge.is_loading() {
        "Knowledge Sources (loading...)".to_string()
    } else {
        format!("Knowledge Sources ({})", knowledge.items().len())
    };
    let block = panel(&title, focused);

    if knowledge.items().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No knowledge sources", theme::hint())).block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = knowledge
        .items()
        .iter()
        .map(|item| {
            let name = match &item.size {
                Some(size) => format!("{} ({size})", item.name),
                None => item.name.clone(),
            };
            let action = if knowledge.is_deleting(&item.id) {
                Cell::from(Span::styled("Deleting...", theme::hint()))
            } else {
                Cell::from("Del")
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(item.kind.label()),
                Cell::from(item.display_date()),
                Cell::from(Span::styled(item.status.label(), status_style(item.status))),
                action,
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(11),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Source", "Type", "Date Added", "Status", "Actions"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block)
    .row_highlight_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if focused {
        state.select(Some(ui.source_selected.min(knowledge.items().len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_confirm_delete(frame: &mut Frame, area: Rect, pending: &PendingDelete) {
    let dialog = centered(area, 60, 9);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ERROR_RED))
        .title(" Delete Knowledge Source ");
    let text = vec![
        Line::from(format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone \
             and will remove all associated knowledge from your AI assistant.",
            pending.name
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme::heading()),
            Span::styled(" Delete   ", theme::hint()),
            Span::styled("n", theme::heading()),
            Span::styled(" Cancel", theme::hint()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        dialog,
    );
}
