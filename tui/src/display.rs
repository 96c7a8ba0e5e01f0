//! Display State Types
//!
//! State the TUI derives from `DeskMessage`s. Everything else it renders is
//! read straight from the Desk's accessors.
//!
//! - `Toast`: a notice shown in the corner for a few seconds
//! - `DisplayState`: page, auth summary, chat window flag, toasts

use std::time::Duration;

use desk_core::{DeskMessage, Notice, NotifyLevel, Page};

/// How long a toast stays up
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Most toasts shown at once; older ones are dropped
pub const MAX_TOASTS: usize = 3;

/// A notice on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Severity
    pub level: NotifyLevel,
    /// Optional heading
    pub title: Option<String>,
    /// Body
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

impl From<Notice> for Toast {
    fn from(notice: Notice) -> Self {
        Self {
            level: notice.level,
            title: notice.title,
            message: notice.message,
            remaining: TOAST_LIFETIME,
        }
    }
}

/// Display state derived from Desk messages
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Page on screen
    pub page: Page,
    /// Path on screen
    pub path: String,
    /// Whether a user is signed in
    pub authenticated: bool,
    /// Signed-in user's email
    pub email: Option<String>,
    /// Whether the chat window is open
    pub chat_open: bool,
    /// Notices, oldest first
    pub toasts: Vec<Toast>,
    /// The Desk has said goodbye
    pub quit: bool,
    /// Pending request to jump the transcript to the newest message
    scroll_to_latest: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            page: Page::Landing,
            path: "/".to_string(),
            authenticated: false,
            email: None,
            chat_open: false,
            toasts: Vec::new(),
            quit: false,
            scroll_to_latest: false,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `DeskMessage`
    pub fn apply_message(&mut self, msg: DeskMessage) {
        match msg {
            DeskMessage::Navigated { page, path } => {
                self.page = page;
                self.path = path;
            }
            DeskMessage::ChatOpened => {
                self.chat_open = true;
                self.scroll_to_latest = true;
            }
            DeskMessage::ChatClosed => self.chat_open = false,
            DeskMessage::ScrollToLatest => self.scroll_to_latest = true,
            DeskMessage::AuthChanged {
                authenticated,
                email,
            } => {
                self.authenticated = authenticated;
                self.email = email;
            }
            DeskMessage::Notify(notice) => {
                self.toasts.push(notice.into());
                if self.toasts.len() > MAX_TOASTS {
                    let excess = self.toasts.len() - MAX_TOASTS;
                    self.toasts.drain(..excess);
                }
            }
            DeskMessage::SettingsSaved => {
                // The success notice follows as its own message
            }
            DeskMessage::Quit => self.quit = true,
        }
    }

    /// Age toasts
    pub fn update(&mut self, delta: Duration) {
        for toast in &mut self.toasts {
            toast.remaining = toast.remaining.saturating_sub(delta);
        }
        self.toasts.retain(|t| !t.remaining.is_zero());
    }

    /// Take the pending scroll request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_latest)
    }

    /// Dismiss every toast
    pub fn clear_toasts(&mut self) {
        self.toasts.clear();
    }
}
