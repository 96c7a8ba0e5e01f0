//! Desk - The Application State Object
//!
//! The `Desk` owns everything a surface shows:
//! - The auth gate and the current location
//! - The open chat window's session, if any
//! - The knowledge base and the settings form
//!
//! # Design Philosophy
//!
//! The Desk is UI-agnostic. A surface forwards `DeskEvent`s, calls `poll` once
//! per frame, reacts to the `DeskMessage`s it receives, and reads the rest of
//! the state through accessors. All network work runs on spawned tasks; the
//! Desk never blocks a frame on a request except for login.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::DeskApi;
use crate::auth::{AuthGate, AuthState, TokenStore};
use crate::config::DeskConfig;
use crate::events::DeskEvent;
use crate::knowledge::{KnowledgeBase, KnowledgeEvent};
use crate::messages::{DeskMessage, Notice};
use crate::routes::{normalize, Page, Resolution, Router};
use crate::session::{ChatSession, SendOutcome};
use crate::settings::{BotSettings, SettingsForm};
use crate::validation::{validate_credentials, InputValidator};

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECTS: usize = 4;

/// Where the user is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Normalized path
    pub path: String,
    /// Page rendered for the path
    pub page: Page,
    /// Destination recorded by a guard redirect, used after login
    pub from: Option<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            page: Page::Landing,
            from: None,
        }
    }
}

/// The application state object
pub struct Desk<A: DeskApi + 'static> {
    config: DeskConfig,
    api: Arc<A>,
    auth: AuthGate<A>,
    router: Router,
    location: Location,
    chat: Option<ChatSession<A>>,
    knowledge: KnowledgeBase<A>,
    settings: SettingsForm,
    tx: mpsc::Sender<DeskMessage>,
    running: bool,
}

impl<A: DeskApi + 'static> Desk<A> {
    /// Create a Desk; call `start` before forwarding events
    pub fn new(
        api: A,
        store: Arc<dyn TokenStore>,
        config: DeskConfig,
        tx: mpsc::Sender<DeskMessage>,
    ) -> Self {
        let api = Arc::new(api);
        let settings = SettingsForm::new(
            BotSettings {
                max_message_length: config.max_message_length,
                ..BotSettings::default()
            },
            config.save_delay,
        );

        Self {
            auth: AuthGate::new(Arc::clone(&api), store, config.variant),
            router: Router::new(config.admin_panel),
            knowledge: KnowledgeBase::new(Arc::clone(&api)),
            location: Location::default(),
            chat: None,
            settings,
            api,
            config,
            tx,
            running: false,
        }
    }

    // ============================================
    // Accessors
    // ============================================

    /// Loaded configuration
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Current location
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Page currently showing
    pub fn page(&self) -> Page {
        self.location.page
    }

    /// Authentication state
    pub fn auth(&self) -> &AuthState {
        self.auth.state()
    }

    /// The open chat window's session
    pub fn chat(&self) -> Option<&ChatSession<A>> {
        self.chat.as_ref()
    }

    /// Knowledge-base page state
    pub fn knowledge(&self) -> &KnowledgeBase<A> {
        &self.knowledge
    }

    /// Knowledge-base page state, for editing the draft
    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase<A> {
        &mut self.knowledge
    }

    /// Settings form
    pub fn settings(&self) -> &SettingsForm {
        &self.settings
    }

    /// Settings form, for editing the draft
    pub fn settings_mut(&mut self) -> &mut SettingsForm {
        &mut self.settings
    }

    /// Whether `start` ran and `stop` has not
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ============================================
    // Lifecycle
    // ============================================

    /// Probe the backend, establish auth, and go to `start_path`
    pub async fn start(&mut self, start_path: &str) -> anyhow::Result<()> {
        tracing::info!(
            api = self.api.name(),
            variant = %self.config.variant,
            base_url = %self.config.api.base_url,
            "Starting desk"
        );

        if !self.api.health_check().await {
            tracing::warn!(base_url = %self.config.api.base_url, "Backend health check failed");
            self.notify(Notice::warning(format!(
                "Backend not available at {} - chat replies will fail until it is reachable",
                self.config.api.base_url
            )))
            .await;
        }

        self.auth.initialize();
        self.send_auth_changed().await;
        self.running = true;
        self.navigate(start_path).await;
        Ok(())
    }

    /// Close the chat window and tell the surface to exit
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        self.close_chat().await;
        self.running = false;
        self.send(DeskMessage::Quit).await;
        Ok(())
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: DeskEvent) -> anyhow::Result<()> {
        match event {
            DeskEvent::Navigate { path } => self.navigate(&path).await,

            DeskEvent::OpenChat => self.open_chat().await,
            DeskEvent::CloseChat => self.close_chat().await,
            DeskEvent::ToggleChat => {
                if self.chat.is_some() {
                    self.close_chat().await;
                } else {
                    self.open_chat().await;
                }
            }
            DeskEvent::SendChat { text } => self.send_chat(&text).await,

            DeskEvent::Login { email, password } => self.login(&email, &password).await,
            DeskEvent::Logout => {
                self.auth.logout();
                self.send_auth_changed().await;
                self.notify(Notice::info("You have been signed out.")).await;
                self.navigate(Page::Login.path()).await;
            }

            DeskEvent::AddFile { path } => {
                if self.require_admin() {
                    if let Err(e) = self.knowledge.draft_mut().add_path(&path) {
                        self.notify(Notice::warning(e.to_string())).await;
                    }
                }
            }
            DeskEvent::RemoveFile { index } => {
                if self.require_admin() {
                    self.knowledge.draft_mut().remove_file(index);
                }
            }
            DeskEvent::SetLink { url } => {
                if self.require_admin() {
                    self.knowledge.draft_mut().set_link(url);
                }
            }
            DeskEvent::SubmitUpload => {
                if self.require_admin() {
                    match self.knowledge.submit_upload() {
                        Ok(()) => {
                            self.notify(Notice::info(
                                "Uploading and indexing... This may take a moment.",
                            ))
                            .await;
                        }
                        Err(e) => self.notify(Notice::warning(e.to_string())).await,
                    }
                }
            }
            DeskEvent::RefreshSources => {
                if self.require_admin() {
                    self.knowledge.refresh();
                }
            }
            DeskEvent::DeleteSource { id } => {
                if self.require_admin() && !self.knowledge.delete(&id) {
                    tracing::debug!(id = %id, "Delete ignored: unknown or already deleting");
                }
            }

            DeskEvent::SaveSettings => {
                if self.require_admin() {
                    if let Err(e) = self.settings.begin_save() {
                        self.notify(Notice::warning(e.to_string())).await;
                    }
                }
            }
            DeskEvent::ResetSettings => {
                if self.require_admin() {
                    self.settings.reset();
                }
            }

            DeskEvent::QuitRequested => self.stop().await?,
        }
        Ok(())
    }

    /// Fold in finished background work
    ///
    /// Returns `true` when anything visible changed.
    pub async fn poll(&mut self) -> bool {
        let appended = self.chat.as_mut().map_or(0, ChatSession::poll);
        let events = self.knowledge.poll();
        let saved = self.settings.poll();
        self.after_background(appended, events, saved).await
    }

    /// Wait for all outstanding background work to finish
    ///
    /// Intended for headless drivers and tests; a surface should `poll`.
    pub async fn settle(&mut self) -> bool {
        let appended = match self.chat.as_mut() {
            Some(chat) => chat.settle().await,
            None => 0,
        };
        let events = self.knowledge.settle().await;
        let saved = self.settings.settle().await;
        self.after_background(appended, events, saved).await
    }

    async fn after_background(
        &mut self,
        appended: usize,
        events: Vec<KnowledgeEvent>,
        saved: bool,
    ) -> bool {
        let changed = appended > 0 || !events.is_empty() || saved;

        if appended > 0 {
            self.send(DeskMessage::ScrollToLatest).await;
        }
        for event in events {
            if let Some(notice) = knowledge_notice(&event) {
                self.notify(notice).await;
            }
        }
        if saved {
            self.send(DeskMessage::SettingsSaved).await;
            self.notify(
                Notice::success("Your chatbot settings have been updated successfully.")
                    .with_title("Settings saved"),
            )
            .await;
        }
        changed
    }

    // ============================================
    // Navigation
    // ============================================

    async fn navigate(&mut self, requested: &str) {
        let mut path = normalize(requested);
        // Only the login page keeps the remembered destination
        let mut from = if path == Page::Login.path() {
            self.location.from.clone()
        } else {
            None
        };

        for _ in 0..MAX_REDIRECTS {
            match self
                .router
                .resolve(&path, self.auth.state(), from.as_deref())
            {
                Resolution::Render(page) => {
                    self.enter(page, path, from).await;
                    return;
                }
                Resolution::Redirect { to, from: next } => {
                    tracing::debug!(from = %path, to = %to, "Redirecting");
                    path = normalize(&to);
                    from = next;
                }
            }
        }

        tracing::warn!(path = %requested, "Redirect loop, showing not found");
        self.enter(Page::NotFound, path, None).await;
    }

    async fn enter(&mut self, page: Page, path: String, from: Option<String>) {
        self.location = Location {
            path: path.clone(),
            page,
            from,
        };

        if !page.shows_chat_widget() {
            self.close_chat().await;
        }
        match page {
            Page::ChatDemo => self.open_chat().await,
            Page::KnowledgeBase => self.knowledge.refresh(),
            _ => {}
        }

        tracing::debug!(path = %path, ?page, "Navigated");
        self.send(DeskMessage::Navigated { page, path }).await;
    }

    // ============================================
    // Chat
    // ============================================

    async fn open_chat(&mut self) {
        if self.chat.is_some() {
            return;
        }
        let validator = InputValidator::new(self.settings.saved().max_message_length);
        self.chat = Some(ChatSession::new(
            Arc::clone(&self.api),
            self.config.api.chat_timeout,
            validator,
        ));
        self.send(DeskMessage::ChatOpened).await;
    }

    async fn close_chat(&mut self) {
        if let Some(session) = self.chat.take() {
            if session.is_typing() {
                tracing::debug!(
                    pending = session.pending_turns(),
                    "Chat closed with requests in flight"
                );
            }
            self.send(DeskMessage::ChatClosed).await;
        }
    }

    async fn send_chat(&mut self, text: &str) {
        if self.chat.is_none() {
            self.open_chat().await;
        }
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        match chat.send_message(text) {
            Ok(SendOutcome::Sent { .. }) => self.send(DeskMessage::ScrollToLatest).await,
            Ok(SendOutcome::Ignored) => {}
            Err(e) => self.notify(Notice::warning(e.to_string())).await,
        }
    }

    // ============================================
    // Auth
    // ============================================

    async fn login(&mut self, email: &str, password: &str) {
        if let Err(e) = validate_credentials(email, password) {
            self.notify(Notice::warning(e.to_string())).await;
            return;
        }

        if self.auth.login(email, password).await {
            self.send_auth_changed().await;
            self.notify(
                Notice::success("Successfully logged in to the admin dashboard.")
                    .with_title("Welcome back!"),
            )
            .await;
            // The login page redirects to the remembered destination
            self.navigate(Page::Login.path()).await;
        } else {
            self.notify(Notice::error("Invalid email or password.").with_title("Login failed"))
                .await;
        }
    }

    fn require_admin(&self) -> bool {
        let allowed = self.router.admin_panel() && self.auth.is_authenticated();
        if !allowed {
            tracing::warn!("Admin action ignored: not signed in");
        }
        allowed
    }

    async fn send_auth_changed(&self) {
        let state = self.auth.state();
        self.send(DeskMessage::AuthChanged {
            authenticated: state.is_authenticated,
            email: state.email().map(str::to_string),
        })
        .await;
    }

    /// Send notification
    async fn notify(&self, notice: Notice) {
        self.send(DeskMessage::Notify(notice)).await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: DeskMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

/// Notice announcing a knowledge-base completion
fn knowledge_notice(event: &KnowledgeEvent) -> Option<Notice> {
    match event {
        KnowledgeEvent::SourcesLoaded { .. } | KnowledgeEvent::SourcesSuperseded => None,
        KnowledgeEvent::SourcesFailed { .. } => {
            Some(Notice::error("Could not load knowledge sources."))
        }
        KnowledgeEvent::UploadSucceeded => {
            Some(Notice::success("Knowledge base updated successfully!"))
        }
        KnowledgeEvent::UploadFailed { .. } => {
            Some(Notice::error("Upload failed. Please check the server logs."))
        }
        KnowledgeEvent::Deleted { .. } => Some(Notice::success("Source deleted successfully.")),
        KnowledgeEvent::DeleteFailed { name, .. } => {
            Some(Notice::error(format!("Could not delete \"{name}\".")))
        }
    }
}
