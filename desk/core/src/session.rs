//! Chat Session
//!
//! The conversation behind one open chat window: an ordered message log, the
//! "assistant is typing" flag, and the request/response round-trip with the
//! backend.
//!
//! # Design Philosophy
//!
//! User messages are appended optimistically and never rolled back. Each send
//! is a numbered turn answered on a spawned task; answers are appended in turn
//! order, so a fast reply to a later question waits for the slower reply to
//! the earlier one. A failed turn still produces exactly one bot message
//! explaining the failure.
//!
//! Dropping the session drops the reply channel. Requests already in flight
//! run to completion and their results are discarded.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::api::{ApiError, DeskApi};
use crate::messages::MessageId;
use crate::validation::{InputValidator, ValidationError};

/// First bot message of every session
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Default upper bound on a chat round-trip
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Who sent a chat message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    /// The person typing
    User,
    /// The assistant
    Bot,
}

/// A message in the chat log
#[derive(Clone, Debug)]
pub struct Message {
    /// Unique, creation-ordered id
    pub id: MessageId,
    /// Message text
    pub text: String,
    /// Author
    pub sender: Sender,
    /// Creation time
    pub timestamp: DateTime<Local>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    /// A message from the user
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// A message from the assistant
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// `HH:MM` local time, as shown next to the bubble
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Why a chat turn failed, as far as the user is concerned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatFailure {
    /// The round-trip exceeded the chat timeout
    Timeout,
    /// The backend answered with a 5xx status
    Server,
    /// The backend could not be reached
    Offline,
    /// Anything else
    Generic,
}

impl ChatFailure {
    /// Classify an API error, checking timeout, then server, then offline
    #[must_use]
    pub fn classify(error: &ApiError) -> Self {
        match error {
            ApiError::Timeout => Self::Timeout,
            ApiError::Server { .. } => Self::Server,
            ApiError::Network(_) => Self::Offline,
            ApiError::Status { .. }
            | ApiError::MalformedResponse(_)
            | ApiError::InvalidRequest(_) => Self::Generic,
        }
    }

    /// Bot message shown for this failure
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Timeout => "The request timed out. Please try again with a shorter question.",
            Self::Server => {
                "There was a server error. Please make sure documents are uploaded and indexed."
            }
            Self::Offline => "Please check your internet connection and try again.",
            Self::Generic => "Sorry, I encountered an error. Please try again.",
        }
    }
}

/// Result of `ChatSession::send_message`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank; nothing happened
    Ignored,
    /// A user message was appended and a request spawned
    Sent {
        /// Turn number of the request
        turn: u64,
    },
}

/// A settled request, reported by the spawned task
#[derive(Debug)]
struct TurnReply {
    turn: u64,
    outcome: Result<String, ApiError>,
}

/// One chat window's conversation
pub struct ChatSession<A: DeskApi + 'static> {
    api: Arc<A>,
    messages: Vec<Message>,
    timeout: Duration,
    validator: InputValidator,
    /// Turn number for the next send
    next_turn: u64,
    /// Oldest turn whose reply has not been appended
    next_to_append: u64,
    /// Settled replies waiting for earlier turns
    settled: BTreeMap<u64, Result<String, ApiError>>,
    reply_tx: mpsc::UnboundedSender<TurnReply>,
    reply_rx: mpsc::UnboundedReceiver<TurnReply>,
}

impl<A: DeskApi + 'static> ChatSession<A> {
    /// Start a session seeded with the welcome message
    pub fn new(api: Arc<A>, timeout: Duration, validator: InputValidator) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            api,
            messages: vec![Message::bot(WELCOME_MESSAGE)],
            timeout,
            validator,
            next_turn: 0,
            next_to_append: 0,
            settled: BTreeMap::new(),
            reply_tx,
            reply_rx,
        }
    }

    /// The message log, oldest first
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether any turn is still waiting for its reply to be appended
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.next_to_append < self.next_turn
    }

    /// Number of turns not yet appended
    #[must_use]
    pub fn pending_turns(&self) -> u64 {
        self.next_turn - self.next_to_append
    }

    /// Send user input
    ///
    /// Blank input is ignored. Otherwise the trimmed text is validated,
    /// appended as a user message, and one chat request is spawned.
    pub fn send_message(&mut self, text: &str) -> Result<SendOutcome, ValidationError> {
        let question = text.trim();
        if question.is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        self.validator.validate_message(question)?;

        self.messages.push(Message::user(question));
        let turn = self.next_turn;
        self.next_turn += 1;

        let api = Arc::clone(&self.api);
        let tx = self.reply_tx.clone();
        let timeout = self.timeout;
        let question = question.to_string();
        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, api.chat(&question)).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout),
            };
            // The session may already be gone
            let _ = tx.send(TurnReply { turn, outcome });
        });

        tracing::debug!(turn, "chat turn sent");
        Ok(SendOutcome::Sent { turn })
    }

    /// Drain settled replies without waiting
    ///
    /// Returns the number of bot messages appended.
    pub fn poll(&mut self) -> usize {
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.settled.insert(reply.turn, reply.outcome);
        }
        self.release()
    }

    /// Wait until every outstanding turn has been appended
    ///
    /// Returns the number of bot messages appended.
    pub async fn settle(&mut self) -> usize {
        let mut appended = self.poll();
        while self.is_typing() {
            let Some(reply) = self.reply_rx.recv().await else {
                break;
            };
            self.settled.insert(reply.turn, reply.outcome);
            appended += self.release();
        }
        appended
    }

    /// Append settled replies in turn order, stopping at the first gap
    fn release(&mut self) -> usize {
        let mut appended = 0;
        while let Some(outcome) = self.settled.remove(&self.next_to_append) {
            let text = match outcome {
                Ok(answer) => answer,
                Err(e) => {
                    let failure = ChatFailure::classify(&e);
                    tracing::warn!(error = %e, ?failure, turn = self.next_to_append, "chat turn failed");
                    failure.text().to_string()
                }
            };
            self.messages.push(Message::bot(text));
            self.next_to_append += 1;
            appended += 1;
        }
        appended
    }
}
