//! HTTP Backend Implementation
//!
//! `DeskApi` over reqwest. The adapter owns the base URL, the default
//! `Content-Type: application/json` header, the optional bearer token and the
//! per-request timeouts:
//! - `POST /api/v1/chat` uses the chat timeout
//! - `POST /api/v1/data/upload` uses the upload timeout
//! - everything else uses the request timeout

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::traits::{
    ChatRequest, ChatResponse, Credentials, DeskApi, LoginResponse, SourcesResponse,
    UploadRequest,
};
use crate::config::ApiConfig;
use crate::knowledge::KnowledgeItem;

/// Timeout for the startup health probe
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// reqwest-backed chatbot API client
pub struct HttpApi {
    /// Server root, e.g. `http://127.0.0.1:8000/`
    base: Url,
    /// HTTP client with default headers installed
    http_client: reqwest::Client,
    chat_timeout: Duration,
    request_timeout: Duration,
    upload_timeout: Duration,
    /// Token sent as `Authorization: Bearer` when present
    bearer: RwLock<Option<String>>,
}

impl HttpApi {
    /// Build a client for the configured server
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("base URL '{}': {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base,
            http_client,
            chat_timeout: config.chat_timeout,
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
            bearer: RwLock::new(None),
        })
    }

    /// The server root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.bearer.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "backend rejected request");
            Err(ApiError::from_status(status.as_u16()))
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl DeskApi for HttpApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.base.clone())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .is_ok()
    }

    async fn chat(&self, question: &str) -> Result<String, ApiError> {
        tracing::debug!(len = question.len(), "sending chat question");
        let builder = self
            .http_client
            .post(self.endpoint(&["api", "v1", "chat"]))
            .timeout(self.chat_timeout)
            .json(&ChatRequest { question });

        let response = self.send(builder).await?;
        let body: ChatResponse = Self::parse(response).await?;
        match body.answer {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Err(ApiError::MalformedResponse("missing answer".to_string())),
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        tracing::debug!(email = %credentials.email, "logging in");
        let builder = self
            .http_client
            .post(self.endpoint(&["login"]))
            .timeout(self.request_timeout)
            .json(credentials);

        let response = self.send(builder).await?;
        let body: LoginResponse = Self::parse(response).await?;
        if body.token.is_empty() {
            return Err(ApiError::MalformedResponse("empty token".to_string()));
        }
        Ok(body.token)
    }

    async fn upload(&self, request: &UploadRequest) -> Result<(), ApiError> {
        let mut form = Form::new();
        for file in &request.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(file.mime)?;
            form = form.part("files", part);
        }
        if let Some(url) = &request.youtube_url {
            form = form.text("youtube_url", url.clone());
        }

        tracing::info!(
            files = request.files.len(),
            link = request.youtube_url.is_some(),
            "uploading to knowledge base"
        );
        let builder = self
            .http_client
            .post(self.endpoint(&["api", "v1", "data", "upload"]))
            .timeout(self.upload_timeout)
            .multipart(form);

        self.send(builder).await?;
        Ok(())
    }

    async fn list_sources(&self) -> Result<Vec<KnowledgeItem>, ApiError> {
        let builder = self
            .http_client
            .get(self.endpoint(&["api", "v1", "data", "sources"]))
            .timeout(self.request_timeout);

        let response = self.send(builder).await?;
        let body: SourcesResponse = Self::parse(response).await?;
        Ok(body.sources)
    }

    async fn delete_source(&self, id: &str) -> Result<(), ApiError> {
        let builder = self
            .http_client
            .delete(self.endpoint(&["api", "v1", "data", "sources", id]))
            .timeout(self.request_timeout);

        self.send(builder).await?;
        Ok(())
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer.write() = token;
    }
}
