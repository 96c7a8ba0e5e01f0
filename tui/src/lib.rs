//! Botdesk TUI - Terminal surface for the chatbot admin client
//!
//! A full-screen terminal UI over `desk_core`: the public landing and chat
//! demo pages, a floating chat window, and the admin panel.
//!
//! # Architecture
//!
//! - **App**: event loop, key bindings, frame pacing
//! - **DeskClient**: the embedded Desk plus its message channel
//! - **Display**: state derived from `DeskMessage`s (page, auth, toasts)
//! - **Pages**: one renderer per page, plus the admin shell
//! - **Widgets**: the scrollable chat transcript

pub mod app;
pub mod desk_client;
pub mod display;
pub mod pages;
pub mod theme;
pub mod ui_state;
pub mod widgets;

pub use app::App;
pub use desk_client::DeskClient;
pub use display::DisplayState;
