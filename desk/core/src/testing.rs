//! Scripted `DeskApi` double for unit tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{ApiError, Credentials, DeskApi, UploadRequest};
use crate::knowledge::KnowledgeItem;

/// Scripted result of one call
#[derive(Clone, Debug)]
pub enum MockOutcome {
    Answer(String),
    Server(u16),
    Status(u16),
    Offline,
    Malformed,
}

impl MockOutcome {
    fn into_result(self) -> Result<String, ApiError> {
        match self {
            Self::Answer(text) => Ok(text),
            Self::Server(status) | Self::Status(status) => Err(ApiError::from_status(status)),
            Self::Offline => Err(ApiError::Network("connection refused".to_string())),
            Self::Malformed => Err(ApiError::MalformedResponse("missing answer".to_string())),
        }
    }
}

pub struct MockApi {
    chat_script: Mutex<VecDeque<(MockOutcome, Duration)>>,
    questions: Mutex<Vec<String>>,
    chat_calls: AtomicUsize,
    pub login_outcome: Mutex<MockOutcome>,
    login_calls: AtomicUsize,
    pub upload_outcome: Mutex<MockOutcome>,
    pub upload_delay: Mutex<Duration>,
    uploads: Mutex<Vec<UploadRequest>>,
    pub sources: Mutex<Vec<KnowledgeItem>>,
    pub list_outcome: Mutex<MockOutcome>,
    list_calls: AtomicUsize,
    list_delays: Mutex<VecDeque<Duration>>,
    pub delete_outcome: Mutex<MockOutcome>,
    pub delete_delay: Mutex<Duration>,
    deletes: Mutex<Vec<String>>,
    pub bearer: Mutex<Option<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            chat_script: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
            chat_calls: AtomicUsize::new(0),
            login_outcome: Mutex::new(MockOutcome::Answer("token-123".to_string())),
            login_calls: AtomicUsize::new(0),
            upload_outcome: Mutex::new(MockOutcome::Answer(String::new())),
            upload_delay: Mutex::new(Duration::ZERO),
            uploads: Mutex::new(Vec::new()),
            sources: Mutex::new(Vec::new()),
            list_outcome: Mutex::new(MockOutcome::Answer(String::new())),
            list_calls: AtomicUsize::new(0),
            list_delays: Mutex::new(VecDeque::new()),
            delete_outcome: Mutex::new(MockOutcome::Answer(String::new())),
            delete_delay: Mutex::new(Duration::ZERO),
            deletes: Mutex::new(Vec::new()),
            bearer: Mutex::new(None),
        }
    }

    pub fn push_chat(&self, outcome: MockOutcome, delay: Duration) {
        self.chat_script.lock().push_back((outcome, delay));
    }

    pub fn chat_count(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }

    pub fn login_count(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().clone()
    }

    /// Delay for the next list call; the list is snapshotted before the wait
    pub fn push_list_delay(&self, delay: Duration) {
        self.list_delays.lock().push_back(delay);
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl DeskApi for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn chat(&self, question: &str) -> Result<String, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().push(question.to_string());
        let scripted = self.chat_script.lock().pop_front();
        let (outcome, delay) =
            scripted.unwrap_or_else(|| (MockOutcome::Answer(format!("Echo: {question}")), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.into_result()
    }

    async fn login(&self, _credentials: &Credentials) -> Result<String, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.login_outcome.lock().clone();
        outcome.into_result()
    }

    async fn upload(&self, request: &UploadRequest) -> Result<(), ApiError> {
        self.uploads.lock().push(request.clone());
        let delay = *self.upload_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.upload_outcome.lock().clone();
        outcome.into_result().map(|_| ())
    }

    async fn list_sources(&self) -> Result<Vec<KnowledgeItem>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.list_outcome.lock().clone();
        outcome.into_result()?;
        let snapshot = self.sources.lock().clone();
        let delay = self.list_delays.lock().pop_front().unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn delete_source(&self, id: &str) -> Result<(), ApiError> {
        self.deletes.lock().push(id.to_string());
        let delay = *self.delete_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.delete_outcome.lock().clone();
        outcome.into_result()?;
        self.sources.lock().retain(|item| item.id != id);
        Ok(())
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer.lock() = token;
    }
}
