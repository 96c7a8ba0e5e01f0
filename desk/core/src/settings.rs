//! Bot Settings
//!
//! The admin settings form. Edits go to a draft of plain strings and toggles;
//! saving validates the draft, waits out the save delay, and commits it as the
//! saved snapshot. Nothing is sent to the backend.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::validation::{is_hex_color, ValidationError, DEFAULT_MAX_MESSAGE_LENGTH};

/// Default pause before a save commits
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(1);

/// Saved chatbot settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotSettings {
    /// Name shown in the chat header
    pub bot_name: String,
    /// Greeting for new conversations
    pub welcome_message: String,
    /// Artificial delay before replies, in milliseconds
    pub response_delay_ms: u64,
    /// Show the typing indicator
    pub typing_indicator: bool,
    /// Send alerts for new conversations
    pub notifications: bool,
    /// Longest accepted chat message, in characters
    pub max_message_length: usize,
    /// Accent color, `#RRGGBB`
    pub primary_color: String,
    /// Track conversation metrics
    pub analytics: bool,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            bot_name: "AI Assistant".to_string(),
            welcome_message: "Hello! How can I help you today?".to_string(),
            response_delay_ms: 1000,
            typing_indicator: true,
            notifications: true,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            primary_color: "#00FFFF".to_string(),
            analytics: true,
        }
    }
}

/// A field of the settings form, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsField {
    /// Bot name
    BotName,
    /// Welcome message
    WelcomeMessage,
    /// Response delay in milliseconds
    ResponseDelay,
    /// Accent color
    PrimaryColor,
    /// Chat message length limit
    MaxMessageLength,
    /// Typing indicator switch
    TypingIndicator,
    /// Analytics switch
    Analytics,
    /// Notifications switch
    Notifications,
}

impl SettingsField {
    /// Every field, in display order
    pub const ALL: [Self; 8] = [
        Self::BotName,
        Self::WelcomeMessage,
        Self::ResponseDelay,
        Self::PrimaryColor,
        Self::MaxMessageLength,
        Self::TypingIndicator,
        Self::Analytics,
        Self::Notifications,
    ];

    /// Form label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BotName => "Bot Name",
            Self::WelcomeMessage => "Welcome Message",
            Self::ResponseDelay => "Response Delay (ms)",
            Self::PrimaryColor => "Primary Color",
            Self::MaxMessageLength => "Max Message Length",
            Self::TypingIndicator => "Typing Indicator",
            Self::Analytics => "Analytics",
            Self::Notifications => "Enable Notifications",
        }
    }

    /// Card the field is grouped under
    #[must_use]
    pub fn section(self) -> &'static str {
        match self {
            Self::BotName | Self::WelcomeMessage | Self::ResponseDelay => "Bot Configuration",
            Self::PrimaryColor | Self::MaxMessageLength => "Appearance",
            Self::TypingIndicator | Self::Analytics => "Features",
            Self::Notifications => "Notifications",
        }
    }

    /// Helper text for toggles
    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::TypingIndicator => Some("Show typing dots when bot is responding"),
            Self::Analytics => Some("Track conversation metrics"),
            Self::Notifications => Some("Receive alerts for new conversations"),
            _ => None,
        }
    }

    /// Whether the field is an on/off switch
    #[must_use]
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            Self::TypingIndicator | Self::Analytics | Self::Notifications
        )
    }
}

/// Current value of a form field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Editable text
    Text(&'a str),
    /// Switch state
    Toggle(bool),
}

/// Unsaved form contents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsDraft {
    bot_name: String,
    welcome_message: String,
    response_delay: String,
    primary_color: String,
    max_message_length: String,
    typing_indicator: bool,
    analytics: bool,
    notifications: bool,
}

impl From<&BotSettings> for SettingsDraft {
    fn from(settings: &BotSettings) -> Self {
        Self {
            bot_name: settings.bot_name.clone(),
            welcome_message: settings.welcome_message.clone(),
            response_delay: settings.response_delay_ms.to_string(),
            primary_color: settings.primary_color.clone(),
            max_message_length: settings.max_message_length.to_string(),
            typing_indicator: settings.typing_indicator,
            analytics: settings.analytics,
            notifications: settings.notifications,
        }
    }
}

impl SettingsDraft {
    /// Validate into a settings snapshot
    pub fn parse(&self) -> Result<BotSettings, ValidationError> {
        let response_delay_ms = self
            .response_delay
            .trim()
            .parse()
            .map_err(|_| ValidationError::NotANumber {
                field: SettingsField::ResponseDelay.label(),
            })?;
        let max_message_length: usize = self
            .max_message_length
            .trim()
            .parse()
            .map_err(|_| ValidationError::NotANumber {
                field: SettingsField::MaxMessageLength.label(),
            })?;
        if max_message_length == 0 {
            return Err(ValidationError::NotPositive {
                field: SettingsField::MaxMessageLength.label(),
            });
        }
        let primary_color = self.primary_color.trim();
        if !is_hex_color(primary_color) {
            return Err(ValidationError::InvalidColor);
        }

        Ok(BotSettings {
            bot_name: self.bot_name.clone(),
            welcome_message: self.welcome_message.clone(),
            response_delay_ms,
            typing_indicator: self.typing_indicator,
            notifications: self.notifications,
            max_message_length,
            primary_color: primary_color.to_string(),
            analytics: self.analytics,
        })
    }

    fn text_mut(&mut self, field: SettingsField) -> Option<&mut String> {
        match field {
            SettingsField::BotName => Some(&mut self.bot_name),
            SettingsField::WelcomeMessage => Some(&mut self.welcome_message),
            SettingsField::ResponseDelay => Some(&mut self.response_delay),
            SettingsField::PrimaryColor => Some(&mut self.primary_color),
            SettingsField::MaxMessageLength => Some(&mut self.max_message_length),
            _ => None,
        }
    }

    fn toggle_mut(&mut self, field: SettingsField) -> Option<&mut bool> {
        match field {
            SettingsField::TypingIndicator => Some(&mut self.typing_indicator),
            SettingsField::Analytics => Some(&mut self.analytics),
            SettingsField::Notifications => Some(&mut self.notifications),
            _ => None,
        }
    }
}

/// The settings page state
pub struct SettingsForm {
    saved: BotSettings,
    draft: SettingsDraft,
    save_delay: Duration,
    /// Validated snapshot waiting for the save delay
    pending: Option<BotSettings>,
    done_tx: mpsc::UnboundedSender<()>,
    done_rx: mpsc::UnboundedReceiver<()>,
}

impl SettingsForm {
    /// Create a form over `saved`
    #[must_use]
    pub fn new(saved: BotSettings, save_delay: Duration) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            draft: SettingsDraft::from(&saved),
            saved,
            save_delay,
            pending: None,
            done_tx,
            done_rx,
        }
    }

    /// Last committed snapshot
    #[must_use]
    pub fn saved(&self) -> &BotSettings {
        &self.saved
    }

    /// Current value of a field in the draft
    #[must_use]
    pub fn value(&self, field: SettingsField) -> FieldValue<'_> {
        let draft = &self.draft;
        match field {
            SettingsField::BotName => FieldValue::Text(&draft.bot_name),
            SettingsField::WelcomeMessage => FieldValue::Text(&draft.welcome_message),
            SettingsField::ResponseDelay => FieldValue::Text(&draft.response_delay),
            SettingsField::PrimaryColor => FieldValue::Text(&draft.primary_color),
            SettingsField::MaxMessageLength => FieldValue::Text(&draft.max_message_length),
            SettingsField::TypingIndicator => FieldValue::Toggle(draft.typing_indicator),
            SettingsField::Analytics => FieldValue::Toggle(draft.analytics),
            SettingsField::Notifications => FieldValue::Toggle(draft.notifications),
        }
    }

    /// Type a character into a text field
    pub fn push_char(&mut self, field: SettingsField, c: char) {
        if let Some(text) = self.draft.text_mut(field) {
            text.push(c);
        }
    }

    /// Delete the last character of a text field
    pub fn pop_char(&mut self, field: SettingsField) {
        if let Some(text) = self.draft.text_mut(field) {
            text.pop();
        }
    }

    /// Replace a text field
    pub fn set_text(&mut self, field: SettingsField, value: impl Into<String>) {
        if let Some(text) = self.draft.text_mut(field) {
            *text = value.into();
        }
    }

    /// Flip a toggle field
    pub fn toggle(&mut self, field: SettingsField) {
        if let Some(flag) = self.draft.toggle_mut(field) {
            *flag = !*flag;
        }
    }

    /// Whether the draft differs from the saved snapshot
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != SettingsDraft::from(&self.saved)
    }

    /// Whether a save is waiting to commit
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate the draft and start the save delay
    ///
    /// The snapshot commits on a later `poll` once the delay has passed. A
    /// second save while one is pending replaces the pending snapshot.
    pub fn begin_save(&mut self) -> Result<(), ValidationError> {
        let settings = self.draft.parse()?;
        let restart = self.pending.is_none();
        self.pending = Some(settings);

        if restart {
            let tx = self.done_tx.clone();
            let delay = self.save_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(());
            });
        }
        Ok(())
    }

    /// Commit a pending save whose delay has passed
    ///
    /// Returns `true` when a snapshot was committed.
    pub fn poll(&mut self) -> bool {
        if self.done_rx.try_recv().is_err() {
            return false;
        }
        self.commit()
    }

    /// Wait for a pending save to commit
    pub async fn settle(&mut self) -> bool {
        if self.pending.is_none() {
            return false;
        }
        if self.done_rx.recv().await.is_none() {
            return false;
        }
        self.commit()
    }

    fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(settings) => {
                tracing::info!(bot_name = %settings.bot_name, "Settings saved");
                self.saved = settings;
                true
            }
            None => false,
        }
    }

    /// Discard the draft
    pub fn reset(&mut self) {
        self.draft = SettingsDraft::from(&self.saved);
    }
}
