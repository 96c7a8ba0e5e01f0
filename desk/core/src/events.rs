//! Desk Events
//!
//! Events sent from a surface to the `Desk`. They describe what the user did;
//! the `Desk` decides what it means.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events from the surface to the Desk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskEvent {
    // ============================================
    // Navigation
    // ============================================
    /// Go to a path (guards and redirects apply)
    Navigate {
        /// Requested path, e.g. `/admin/settings`
        path: String,
    },

    // ============================================
    // Chat
    // ============================================
    /// Open the floating chat window
    OpenChat,

    /// Close the floating chat window
    CloseChat,

    /// Open the chat window if closed, close it if open
    ToggleChat,

    /// Send text from the chat input
    SendChat {
        /// Raw input text (trimmed before sending)
        text: String,
    },

    // ============================================
    // Auth
    // ============================================
    /// Submit the login form
    Login {
        /// Email field
        email: String,
        /// Password field
        password: String,
    },

    /// Sign out
    Logout,

    // ============================================
    // Knowledge base
    // ============================================
    /// Add a local document to the upload draft
    AddFile {
        /// Path of the document on disk
        path: PathBuf,
    },

    /// Remove a document from the upload draft
    RemoveFile {
        /// Position in the draft's file list
        index: usize,
    },

    /// Replace the draft's video link
    SetLink {
        /// Link text as typed
        url: String,
    },

    /// Upload the draft
    SubmitUpload,

    /// Re-fetch the source list
    RefreshSources,

    /// Delete a knowledge source
    DeleteSource {
        /// Source id
        id: String,
    },

    // ============================================
    // Settings
    // ============================================
    /// Validate and save the settings draft
    SaveSettings,

    /// Discard the settings draft
    ResetSettings,

    // ============================================
    // Lifecycle
    // ============================================
    /// The user asked to quit
    QuitRequested,
}
