//! Input Validation
//!
//! Local checks applied before anything is sent to the backend:
//! - Chat input length and control characters
//! - Login form completeness
//! - Knowledge-base file types and upload contents
//! - Settings field formats
//!
//! # Design Philosophy
//!
//! Validation runs where untrusted input enters the desk. A rejected input
//! never produces a request; the caller turns the error into a notice.

use thiserror::Error;

/// Default maximum chat message length, in characters
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

/// Rejected local input
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Message longer than the configured limit
    #[error("Message too long: {length} characters (max: {max})")]
    TooLong {
        /// Length of the rejected message
        length: usize,
        /// Configured limit
        max: usize,
    },

    /// Message contains control characters other than newline, tab, CR
    #[error("Message contains invalid control characters")]
    ControlCharacters,

    /// Login form submitted with a blank field
    #[error("Email and password are required")]
    MissingCredentials,

    /// File is not a PDF or DOCX document
    #[error("Invalid file type: {0}. Only PDF and DOCX files are supported.")]
    UnsupportedFile(String),

    /// File could not be read from disk
    #[error("Could not read {path}: {reason}")]
    UnreadableFile {
        /// Path as given
        path: String,
        /// I/O error text
        reason: String,
    },

    /// Upload submitted with no files and no link
    #[error("No files or URL to upload.")]
    NothingToUpload,

    /// A numeric settings field does not parse
    #[error("{field} must be a whole number")]
    NotANumber {
        /// Field label
        field: &'static str,
    },

    /// A numeric settings field that must be positive is zero
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Field label
        field: &'static str,
    },

    /// The color field is not `#RRGGBB`
    #[error("Primary color must be a hex color like #00FFFF")]
    InvalidColor,
}

/// Validator for chat input
#[derive(Clone, Debug)]
pub struct InputValidator {
    max_message_length: usize,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_LENGTH)
    }
}

impl InputValidator {
    /// Create a validator with the given message length limit
    #[must_use]
    pub fn new(max_message_length: usize) -> Self {
        Self { max_message_length }
    }

    /// The configured message length limit
    #[must_use]
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Validate an already-trimmed chat message
    pub fn validate_message(&self, content: &str) -> Result<(), ValidationError> {
        let length = content.chars().count();
        if length > self.max_message_length {
            return Err(ValidationError::TooLong {
                length,
                max: self.max_message_length,
            });
        }

        // Newline, tab and CR are allowed
        if content
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r')
        {
            return Err(ValidationError::ControlCharacters);
        }

        Ok(())
    }
}

/// Both login fields must be non-blank
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Whether `value` is a `#RRGGBB` color
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
