//! Backend API Traits
//!
//! Trait definition for the chatbot backend. Every component that talks to
//! the server does so through `DeskApi`, so the state machines in this crate
//! can be driven by the real HTTP adapter or by a test double.
//!
//! # Design Philosophy
//!
//! The trait mirrors the server's endpoints one-to-one:
//! - Chat questions and answers
//! - Admin login
//! - Knowledge-base upload, listing and deletion
//! - A health probe
//!
//! Implementations own transport concerns (base URL, headers, timeouts).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::knowledge::KnowledgeItem;

/// Login credentials sent to `POST /login`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a chat request
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// The user's question
    pub question: &'a str,
}

/// Body of a chat response
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    /// The answer; absent or empty means the reply is unusable
    #[serde(default)]
    pub answer: Option<String>,
}

/// Body of a successful login response
///
/// The server also sends `success` and `user`; only the token is used.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    /// Session token
    pub token: String,
}

/// Body of `GET /api/v1/data/sources`
#[derive(Clone, Debug, Deserialize)]
pub struct SourcesResponse {
    /// Indexed knowledge sources
    #[serde(default)]
    pub sources: Vec<KnowledgeItem>,
}

/// One document in a multipart upload
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent with the part
    pub file_name: String,
    /// MIME type of the part
    pub mime: &'static str,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A validated knowledge-base upload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadRequest {
    /// Documents, one `files` part each
    pub files: Vec<UploadFile>,
    /// Optional video link, sent as the `youtube_url` field
    pub youtube_url: Option<String>,
}

impl UploadRequest {
    /// Whether there is nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.youtube_url.is_none()
    }
}

/// The chatbot backend
#[async_trait]
pub trait DeskApi: Send + Sync {
    /// Name for logs
    fn name(&self) -> &str;

    /// Whether the backend answers at all
    async fn health_check(&self) -> bool;

    /// Ask a question, returning the non-empty answer
    async fn chat(&self, question: &str) -> Result<String, ApiError>;

    /// Exchange credentials for a session token
    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// Upload documents and/or a video link for indexing
    async fn upload(&self, request: &UploadRequest) -> Result<(), ApiError>;

    /// List indexed knowledge sources
    async fn list_sources(&self) -> Result<Vec<KnowledgeItem>, ApiError>;

    /// Delete one knowledge source by id
    async fn delete_source(&self, id: &str) -> Result<(), ApiError>;

    /// Set or clear the bearer token attached to later requests
    fn set_bearer_token(&self, _token: Option<String>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("admin@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_chat_response_missing_answer() {
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.answer.is_none());
    }

    #[test]
    fn test_login_response_ignores_extra_fields() {
        let body = r#"{"success": true, "token": "abc", "user": {"email": "a@b.com"}}"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.token, "abc");
    }

    #[test]
    fn test_upload_request_empty() {
        assert!(UploadRequest::default().is_empty());
        let request = UploadRequest {
            files: Vec::new(),
            youtube_url: Some("https://youtu.be/x".to_string()),
        };
        assert!(!request.is_empty());
    }
}
