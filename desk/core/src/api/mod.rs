//! Chatbot Backend Access
//!
//! Abstracted access to the chatbot server through a common trait.
//!
//! # Usage
//!
//! ```ignore
//! use desk_core::api::{DeskApi, HttpApi};
//! use desk_core::config::ApiConfig;
//!
//! let api = HttpApi::new(&ApiConfig::default())?;
//! let answer = api.chat("What are your business hours?").await?;
//! ```

mod error;
mod http;
mod traits;

pub use error::ApiError;
pub use http::HttpApi;
pub use traits::{
    ChatRequest, ChatResponse, Credentials, DeskApi, LoginResponse, SourcesResponse, UploadFile,
    UploadRequest,
};
