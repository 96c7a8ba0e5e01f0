//! Main Application
//!
//! The App manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse)
//! - DeskClient for all state and requests
//! - DisplayState and UiState for rendering
//!
//! Each frame the App:
//! 1. Converts terminal events to `DeskEvent`s (or local edits)
//! 2. Polls the Desk for finished background work
//! 3. Applies `DeskMessage`s to the display state
//! 4. Renders pages from the display state and the Desk's accessors

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};

use desk_core::{Desk, DeskApi, DeskConfig, DeskEvent, Page, SettingsForm, TokenStore};

use crate::desk_client::DeskClient;
use crate::display::DisplayState;
use crate::pages;
use crate::ui_state::{step, KnowledgeFocus, LoginField, PendingDelete, UiState};

/// Target frame time (~30 FPS)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Lines moved per PageUp/PageDown
const PAGE_SCROLL: usize = 5;

/// Lines moved per mouse wheel notch
const WHEEL_SCROLL: usize = 3;

/// Main application state
pub struct App<A: DeskApi + 'static> {
    /// Is the app still running?
    running: bool,
    /// Client for the embedded Desk
    client: DeskClient<A>,
    /// Display state derived from DeskMessages
    display: DisplayState,
    /// Input buffers and focus
    ui: UiState,
    /// Last frame time (for toast expiry)
    last_frame: Instant,
}

impl<A: DeskApi + 'static> App<A> {
    /// Create a new App around a fresh Desk
    pub fn new(api: A, store: Arc<dyn TokenStore>, config: DeskConfig) -> Self {
        Self {
            running: true,
            client: DeskClient::new(api, store, config),
            display: DisplayState::new(),
            ui: UiState::default(),
            last_frame: Instant::now(),
        }
    }

    /// Start the Desk at `path` and fold in its first messages
    pub async fn start(&mut self, path: &str) -> anyhow::Result<()> {
        self.client.start(path).await?;
        self.process_desk_messages();
        Ok(())
    }

    /// Main event loop
    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        start_path: &str,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;
        self.start(start_path).await?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await;
                        }
                        Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                _ = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.tick().await;
            terminal.draw(|frame| self.draw(frame))?;

            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// Poll background work, apply messages and age toasts
    pub async fn tick(&mut self) {
        self.client.poll().await;
        self.process_desk_messages();

        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;
    }

    /// Wait for every outstanding request, then apply messages
    pub async fn settle(&mut self) {
        self.client.settle().await;
        self.process_desk_messages();
    }

    /// Render one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        if self.display.take_scroll_request() {
            self.ui.transcript.scroll_to_latest();
        }
        pages::draw(frame, self.client.desk(), &self.display, &mut self.ui);
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Display state built from desk messages
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Local form and focus state
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The embedded Desk
    pub fn desk(&self) -> &Desk<A> {
        self.client.desk()
    }

    fn process_desk_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
        if self.display.quit {
            self.running = false;
        }
    }

    async fn send(&mut self, event: DeskEvent) {
        self.client.send(event).await;
        self.process_desk_messages();
    }

    async fn navigate(&mut self, path: &str) {
        self.ui.pending_delete = None;
        self.send(DeskEvent::Navigate {
            path: path.to_string(),
        })
        .await;
    }

    async fn quit(&mut self) {
        self.send(DeskEvent::QuitRequested).await;
        self.running = false;
    }

    // ============================================
    // Input
    // ============================================

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.quit().await;
            return;
        }

        let page = self.client.desk().page();
        match key.code {
            KeyCode::F(n @ 1..=3) => {
                let target = Page::ADMIN_NAV[usize::from(n) - 1];
                self.navigate(target.path()).await;
                return;
            }
            KeyCode::F(4) if page.shows_chat_widget() && page != Page::ChatDemo => {
                self.send(DeskEvent::ToggleChat).await;
                return;
            }
            KeyCode::F(9) if self.display.authenticated => {
                self.ui.pending_delete = None;
                self.send(DeskEvent::Logout).await;
                return;
            }
            _ => {}
        }

        if self.display.chat_open && self.handle_chat_key(key, page).await {
            return;
        }

        match page {
            Page::Landing => match key.code {
                KeyCode::Char('c') => self.navigate(Page::ChatDemo.path()).await,
                KeyCode::Char('a') => self.navigate("/admin").await,
                KeyCode::Char('q') => self.quit().await,
                _ => {}
            },
            Page::ChatDemo | Page::Dashboard => {
                if key.code == KeyCode::Esc {
                    self.navigate(Page::Landing.path()).await;
                }
            }
            Page::Login => self.handle_login_key(key).await,
            Page::KnowledgeBase => self.handle_knowledge_key(key).await,
            Page::Settings => self.handle_settings_key(key).await,
            Page::NotFound => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.navigate(Page::Landing.path()).await;
                }
            }
        }
    }

    /// Keys for the open chat window; returns whether the key was used
    async fn handle_chat_key(&mut self, key: KeyEvent, page: Page) -> bool {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.ui.chat_input);
                self.send(DeskEvent::SendChat { text }).await;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.ui.chat_input.push(c);
            }
            KeyCode::Backspace => {
                self.ui.chat_input.pop();
            }
            KeyCode::PageUp => self.ui.transcript.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => self.ui.transcript.scroll_down(PAGE_SCROLL),
            KeyCode::Esc if page == Page::ChatDemo => {
                self.navigate(Page::Landing.path()).await;
            }
            KeyCode::Esc => self.send(DeskEvent::CloseChat).await,
            _ => return false,
        }
        true
    }

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.ui.login_focus = self.ui.login_focus.next();
            }
            KeyCode::Enter => {
                if self.ui.login_focus == LoginField::Email && self.ui.login_password.is_empty() {
                    self.ui.login_focus = LoginField::Password;
                    return;
                }
                let event = DeskEvent::Login {
                    email: self.ui.login_email.clone(),
                    password: self.ui.login_password.clone(),
                };
                self.send(event).await;
                if self.display.authenticated {
                    self.ui.clear_login();
                }
            }
            KeyCode::Esc => self.navigate(Page::Landing.path()).await,
            KeyCode::Backspace => {
                self.login_field().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.login_field().push(c);
            }
            _ => {}
        }
    }

    fn login_field(&mut self) -> &mut String {
        match self.ui.login_focus {
            LoginField::Email => &mut self.ui.login_email,
            LoginField::Password => &mut self.ui.login_password,
        }
    }

    async fn handle_knowledge_key(&mut self, key: KeyEvent) {
        if let Some(pending) = self.ui.pending_delete.take() {
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                    self.send(DeskEvent::DeleteSource { id: pending.id }).await;
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {}
                // the dialog stays up until answered
                _ => self.ui.pending_delete = Some(pending),
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => {
                self.ui.knowledge_focus = self.ui.knowledge_focus.next();
                return;
            }
            KeyCode::Char('u') if ctrl => {
                self.submit_upload().await;
                return;
            }
            KeyCode::Esc => {
                self.navigate(Page::Landing.path()).await;
                return;
            }
            _ => {}
        }

        match self.ui.knowledge_focus {
            KnowledgeFocus::FilePath => match key.code {
                KeyCode::Enter => {
                    let path = self.ui.file_path.trim().to_string();
                    if !path.is_empty() {
                        self.send(DeskEvent::AddFile {
                            path: PathBuf::from(path),
                        })
                        .await;
                        self.ui.file_path.clear();
                    }
                }
                KeyCode::Backspace => {
                    self.ui.file_path.pop();
                }
                KeyCode::Char(c) if !ctrl => self.ui.file_path.push(c),
                _ => {}
            },
            KnowledgeFocus::Files => {
                let len = self.client.desk().knowledge().draft().files().len();
                match key.code {
                    KeyCode::Up => self.ui.file_selected = step(self.ui.file_selected, len, false),
                    KeyCode::Down => self.ui.file_selected = step(self.ui.file_selected, len, true),
                    KeyCode::Delete | KeyCode::Backspace if len > 0 => {
                        let index = self.ui.file_selected.min(len - 1);
                        self.send(DeskEvent::RemoveFile { index }).await;
                        self.ui.file_selected = step(index, len - 1, false);
                    }
                    _ => {}
                }
            }
            KnowledgeFocus::Link => match key.code {
                KeyCode::Enter => self.submit_upload().await,
                KeyCode::Backspace => {
                    self.ui.link.pop();
                    self.sync_link().await;
                }
                KeyCode::Char(c) if !ctrl => {
                    self.ui.link.push(c);
                    self.sync_link().await;
                }
                _ => {}
            },
            KnowledgeFocus::Sources => {
                let items = self.client.desk().knowledge().items();
                let len = items.len();
                let selected = items
                    .get(self.ui.source_selected.min(len.saturating_sub(1)))
                    .map(|item| PendingDelete {
                        id: item.id.clone(),
                        name: item.name.clone(),
                    });
                match key.code {
                    KeyCode::Up => {
                        self.ui.source_selected = step(self.ui.source_selected, len, false);
                    }
                    KeyCode::Down => {
                        self.ui.source_selected = step(self.ui.source_selected, len, true);
                    }
                    KeyCode::Delete | KeyCode::Char('d') => {
                        self.ui.pending_delete = selected;
                    }
                    KeyCode::Char('r') => self.send(DeskEvent::RefreshSources).await,
                    _ => {}
                }
            }
        }
    }

    async fn sync_link(&mut self) {
        let url = self.ui.link.clone();
        self.send(DeskEvent::SetLink { url }).await;
    }

    async fn submit_upload(&mut self) {
        self.send(DeskEvent::SubmitUpload).await;
        // The Desk clears the draft once the upload is on its way
        if self.client.desk().knowledge().draft().link().is_empty() {
            self.ui.link.clear();
            self.ui.file_selected = 0;
        }
    }

    async fn handle_settings_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let field = self.ui.settings_field();
        match key.code {
            KeyCode::Char('s') if ctrl => self.send(DeskEvent::SaveSettings).await,
            KeyCode::Char('r') if ctrl => self.send(DeskEvent::ResetSettings).await,
            KeyCode::Up | KeyCode::BackTab => self.ui.move_settings(false),
            KeyCode::Down | KeyCode::Tab => self.ui.move_settings(true),
            KeyCode::Esc => self.navigate(Page::Landing.path()).await,
            KeyCode::Char(' ') | KeyCode::Enter if field.is_toggle() => {
                self.settings_form().toggle(field);
            }
            KeyCode::Backspace => self.settings_form().pop_char(field),
            KeyCode::Char(c) if !ctrl => self.settings_form().push_char(field, c),
            _ => {}
        }
    }

    fn settings_form(&mut self) -> &mut SettingsForm {
        self.client.desk_mut().settings_mut()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.display.chat_open {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.ui.transcript.scroll_up(WHEEL_SCROLL),
            MouseEventKind::ScrollDown => self.ui.transcript.scroll_down(WHEEL_SCROLL),
            _ => {}
        }
    }
}
