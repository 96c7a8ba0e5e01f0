//! Desk Messages
//!
//! Messages sent from the `Desk` to the surface. They tell the renderer what
//! changed; the surface reads the rest of the state straight from the `Desk`.
//!
//! # Design Philosophy
//!
//! The surface is a thin renderer. It never decides whether a login worked or
//! which page is showing; it reacts to these messages and draws what the
//! `Desk` exposes.

use serde::{Deserialize, Serialize};

use crate::routes::Page;

/// Messages from the Desk to the surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskMessage {
    // ============================================
    // Navigation
    // ============================================
    /// The current location changed
    Navigated {
        /// Page now showing
        page: Page,
        /// Normalized path of the location
        path: String,
    },

    // ============================================
    // Chat
    // ============================================
    /// The chat window was opened with a fresh session
    ChatOpened,

    /// The chat window was closed and its session dropped
    ChatClosed,

    /// The chat log or typing flag changed; keep the latest message visible
    ScrollToLatest,

    // ============================================
    // Auth
    // ============================================
    /// Authentication state changed
    AuthChanged {
        /// Whether a user is signed in
        authenticated: bool,
        /// Signed-in user's email
        email: Option<String>,
    },

    // ============================================
    // Notices
    // ============================================
    /// A transient notice (toast) for the user
    Notify(Notice),

    /// The settings form committed a new snapshot
    SettingsSaved,

    /// The desk stopped; the surface should exit
    Quit,
}

/// Severity of a notice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    #[default]
    Info,
    /// Operation succeeded
    Success,
    /// Something needs attention but nothing failed
    Warning,
    /// Operation failed
    Error,
}

/// A user-facing notice
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NotifyLevel,
    /// Optional heading
    pub title: Option<String>,
    /// Body text
    pub message: String,
}

impl Notice {
    /// Create an untitled notice
    pub fn new(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            title: None,
            message: message.into(),
        }
    }

    /// Add a heading
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Info, message)
    }

    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Success, message)
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Warning, message)
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotifyLevel::Error, message)
    }
}

/// Unique identifier for a chat message
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        Self(format!("msg_{}", Self::next_sequence()))
    }

    /// Numeric part of the id, if it was generated by `new`
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("msg_")?.parse().ok()
    }

    fn next_sequence() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_are_monotonic() {
        let first = MessageId::new();
        let second = MessageId::new();
        assert_ne!(first, second);
        assert!(first.sequence().unwrap() < second.sequence().unwrap());
    }

    #[test]
    fn test_notice_builders() {
        let notice = Notice::error("Invalid email or password.").with_title("Login failed");
        assert_eq!(notice.level, NotifyLevel::Error);
        assert_eq!(notice.title.as_deref(), Some("Login failed"));
    }
}
