//! Desk Core - Headless State and HTTP for botdesk
//!
//! This crate holds everything the chatbot admin client does, independent of
//! any UI framework: the chat session, authentication and route guarding,
//! the knowledge-base upload flow, the settings form, and the HTTP adapter
//! that talks to the chatbot server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surface                           │
//! │                   botdesk-tui (ratatui)                      │
//! │                             │                                │
//! │              DeskEvent (up)   DeskMessage (down)             │
//! └─────────────────────────────┼────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼────────────────────────────────┐
//! │                         DESK CORE                            │
//! │  ┌──────────────────────────┴─────────────────────────────┐  │
//! │  │                         Desk                           │  │
//! │  │  ┌──────────┐ ┌────────┐ ┌───────────┐ ┌────────────┐  │  │
//! │  │  │ AuthGate │ │ Router │ │ Knowledge │ │  Settings  │  │  │
//! │  │  │          │ │        │ │   Base    │ │    Form    │  │  │
//! │  │  └──────────┘ └────────┘ └───────────┘ └────────────┘  │  │
//! │  │  ┌─────────────────────┐                               │  │
//! │  │  │ ChatSession (open   │                               │  │
//! │  │  │ chat window only)   │                               │  │
//! │  │  └─────────────────────┘                               │  │
//! │  └────────────────────────┬───────────────────────────────┘  │
//! │                           │ DeskApi                          │
//! │                    ┌──────┴──────┐                           │
//! │                    │   HttpApi   │──── chatbot server        │
//! │                    └─────────────┘                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use desk_core::{Desk, DeskEvent, HttpApi, MemoryTokenStore, load_config};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let api = HttpApi::new(&config.api)?;
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut desk = Desk::new(api, Arc::new(MemoryTokenStore::new()), config, tx);
//!
//!     desk.start("/").await?;
//!     desk.handle_event(DeskEvent::SendChat { text: "Hi".into() }).await?;
//!
//!     loop {
//!         desk.poll().await;
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message
//!         }
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`api`]: Backend trait, reqwest adapter, error taxonomy
//! - [`auth`]: Auth gate and token persistence
//! - [`config`]: TOML/env/CLI configuration
//! - [`dashboard`]: Dashboard placeholder metrics
//! - [`desk`]: The application state object
//! - [`events`]: Events from the surface to the Desk
//! - [`knowledge`]: Knowledge-base list and upload draft
//! - [`messages`]: Messages from the Desk to the surface
//! - [`routes`]: Path-to-page table and the admin guard
//! - [`session`]: Chat session
//! - [`settings`]: Settings form
//! - [`validation`]: Local input checks
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod desk;
pub mod events;
pub mod knowledge;
pub mod messages;
pub mod routes;
pub mod session;
pub mod settings;
pub mod validation;

#[cfg(test)]
mod testing;

// Core types
pub use desk::{Desk, Location};
pub use events::DeskEvent;
pub use messages::{DeskMessage, MessageId, Notice, NotifyLevel};

// Backend
pub use api::{ApiError, Credentials, DeskApi, HttpApi, UploadFile, UploadRequest};

// Auth and routing
pub use auth::{
    AuthGate, AuthState, FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError, User,
};
pub use routes::{Page, Resolution, Router};

// Chat
pub use session::{ChatFailure, ChatSession, Message, SendOutcome, Sender, WELCOME_MESSAGE};

// Admin pages
pub use knowledge::{
    IndexStatus, KnowledgeBase, KnowledgeEvent, KnowledgeItem, KnowledgeType, UploadDraft,
};
pub use settings::{BotSettings, FieldValue, SettingsField, SettingsForm};

// Configuration
pub use config::{
    default_config_path, load_config, load_config_from_path, ApiConfig, ConfigError,
    ConfigOverrides, ConfigSource, DeskConfig, Variant,
};
pub use validation::{InputValidator, ValidationError};
