//! Desk Client
//!
//! Thin wrapper around the Desk for TUI integration.
//! The Desk is embedded directly (no network between surface and core);
//! this client pairs it with the receiving end of its message channel.
//!
//! The TUI's job is:
//! 1. Convert key presses to `DeskEvent`s
//! 2. Hand them to the Desk
//! 3. Drain `DeskMessage`s
//! 4. Render display state and Desk accessors

use std::sync::Arc;

use tokio::sync::mpsc;

use desk_core::{Desk, DeskApi, DeskConfig, DeskEvent, DeskMessage, TokenStore};

/// Capacity of the Desk-to-surface channel
const MESSAGE_BUFFER: usize = 256;

/// Client for the embedded Desk
pub struct DeskClient<A: DeskApi + 'static> {
    desk: Desk<A>,
    rx: mpsc::Receiver<DeskMessage>,
}

impl<A: DeskApi + 'static> DeskClient<A> {
    /// Create a client with a fresh Desk
    pub fn new(api: A, store: Arc<dyn TokenStore>, config: DeskConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);
        let desk = Desk::new(api, store, config, tx);
        Self { desk, rx }
    }

    /// Start the Desk at `path`
    pub async fn start(&mut self, path: &str) -> anyhow::Result<()> {
        self.desk.start(path).await
    }

    /// Forward an event
    pub async fn send(&mut self, event: DeskEvent) {
        if let Err(e) = self.desk.handle_event(event).await {
            tracing::warn!(error = %e, "Desk rejected event");
        }
    }

    /// Fold in finished background work (call once per frame)
    pub async fn poll(&mut self) -> bool {
        self.desk.poll().await
    }

    /// Wait for all background work
    pub async fn settle(&mut self) -> bool {
        self.desk.settle().await
    }

    /// Receive all pending messages (non-blocking)
    pub fn recv_all(&mut self) -> Vec<DeskMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// The embedded Desk
    pub fn desk(&self) -> &Desk<A> {
        &self.desk
    }

    /// The embedded Desk, for editing drafts in place
    pub fn desk_mut(&mut self) -> &mut Desk<A> {
        &mut self.desk
    }
}
