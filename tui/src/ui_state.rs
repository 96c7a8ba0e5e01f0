//! Surface-local input state
//!
//! Text being typed, which field has focus, and list selections. None of it
//! reaches the Desk until the user submits.

use desk_core::SettingsField;

use crate::widgets::TranscriptState;

/// Login form fields
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    /// The other field
    pub fn next(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// Knowledge-base page panels, in tab order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KnowledgeFocus {
    #[default]
    FilePath,
    Files,
    Link,
    Sources,
}

impl KnowledgeFocus {
    const ORDER: [Self; 4] = [Self::FilePath, Self::Files, Self::Link, Self::Sources];

    /// Next panel, wrapping
    pub fn next(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }
}

/// A source the user asked to delete, waiting for y/n
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    /// Source id sent to the server
    pub id: String,
    /// Name shown in the dialog
    pub name: String,
}

/// Everything the surface tracks between frames
#[derive(Debug, Default)]
pub struct UiState {
    /// Chat input line
    pub chat_input: String,
    /// Chat transcript scroll
    pub transcript: TranscriptState,

    /// Login email field
    pub login_email: String,
    /// Login password field
    pub login_password: String,
    /// Focused login field
    pub login_focus: LoginField,

    /// Focused knowledge-base panel
    pub knowledge_focus: KnowledgeFocus,
    /// Path being typed for the next file
    pub file_path: String,
    /// Link field, mirrored into the Desk's draft on every edit
    pub link: String,
    /// Selected row in the draft's file list
    pub file_selected: usize,
    /// Selected row in the sources table
    pub source_selected: usize,
    /// Delete awaiting confirmation
    pub pending_delete: Option<PendingDelete>,

    /// Selected settings field, as an index into `SettingsField::ALL`
    pub settings_selected: usize,
}

impl UiState {
    /// The focused settings field
    pub fn settings_field(&self) -> SettingsField {
        SettingsField::ALL[self.settings_selected.min(SettingsField::ALL.len() - 1)]
    }

    /// Move the settings selection, clamped
    pub fn move_settings(&mut self, down: bool) {
        let last = SettingsField::ALL.len() - 1;
        self.settings_selected = if down {
            (self.settings_selected + 1).min(last)
        } else {
            self.settings_selected.saturating_sub(1)
        };
    }

    /// Forget the login form (after a successful sign-in)
    pub fn clear_login(&mut self) {
        self.login_email.clear();
        self.login_password.clear();
        self.login_focus = LoginField::Email;
    }
}

/// Move a list selection, clamped to `len`
pub fn step(selected: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1).min(len - 1)
    }
}
