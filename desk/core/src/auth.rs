//! Authentication
//!
//! Holds who is signed in and guards the admin pages.
//!
//! # Design Philosophy
//!
//! The gate has two behaviours picked at start-up:
//! - **Demo**: starts signed in as `admin@chatbot.local` and accepts any
//!   non-empty credential pair without a request.
//! - **Full**: exchanges credentials for a token at `POST /login`, persists the
//!   token and email through a `TokenStore`, and restores them on the next
//!   start.
//!
//! Failures are never surfaced in detail: `login` answers `true` or `false`
//! and the surface shows one generic notice.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::api::{Credentials, DeskApi};
use crate::config::Variant;
use crate::validation::validate_credentials;

/// Identity used by the demo variant
pub const DEMO_USER_EMAIL: &str = "admin@chatbot.local";

/// Store key for the session token
pub const TOKEN_KEY: &str = "authToken";

/// Store key for the signed-in email
pub const EMAIL_KEY: &str = "userEmail";

/// A signed-in user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Account email
    pub email: String,
}

/// Authentication state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Whether someone is signed in
    pub is_authenticated: bool,
    /// The signed-in user
    pub user: Option<User>,
}

impl AuthState {
    /// Signed in as `email`
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            user: Some(User {
                email: email.into(),
            }),
        }
    }

    /// Email of the signed-in user
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

// ============================================
// Token storage
// ============================================

/// Token storage failure
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the store file failed
    #[error("token store {path}: {source}")]
    Io {
        /// Store file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The store contents could not be encoded
    #[error("token store encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value persistence for the session token and email
pub trait TokenStore: Send + Sync {
    /// Read a key
    fn get(&self, key: &str) -> Option<String>;

    /// Write a key
    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError>;

    /// Remove a key
    fn remove(&self, key: &str) -> Result<(), TokenStoreError>;
}

/// Process-lifetime store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// JSON file store, rewritten on every change
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileTokenStore {
    /// Default location: `$XDG_DATA_HOME/botdesk/session.json`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("botdesk").join("session.json"))
    }

    /// Open a store, loading existing contents
    ///
    /// A missing file is an empty store. A corrupt file is logged and
    /// treated as empty; it is overwritten on the next change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TokenStoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt token store");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(TokenStoreError::Io { path, source }),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Store file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        let io_err = |source| TokenStoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents).map_err(io_err)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        let mut values = self.values.lock();
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&values)
    }
}

// ============================================
// Auth gate
// ============================================

/// Owner of the authentication state
pub struct AuthGate<A: DeskApi> {
    api: Arc<A>,
    store: Arc<dyn TokenStore>,
    variant: Variant,
    state: AuthState,
}

impl<A: DeskApi> AuthGate<A> {
    /// Create a signed-out gate; call `initialize` before use
    pub fn new(api: Arc<A>, store: Arc<dyn TokenStore>, variant: Variant) -> Self {
        Self {
            api,
            store,
            variant,
            state: AuthState::default(),
        }
    }

    /// Establish the start-up state
    ///
    /// Demo: signed in as the demo user. Full: signed in only if both the
    /// token and the email were persisted.
    pub fn initialize(&mut self) {
        match self.variant {
            Variant::Demo => {
                self.state = AuthState::signed_in(DEMO_USER_EMAIL);
            }
            Variant::Full => {
                match (self.store.get(TOKEN_KEY), self.store.get(EMAIL_KEY)) {
                    (Some(token), Some(email)) => {
                        tracing::info!(email = %email, "Restored saved session");
                        self.api.set_bearer_token(Some(token));
                        self.state = AuthState::signed_in(email);
                    }
                    _ => self.state = AuthState::default(),
                }
            }
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Whether someone is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Which behaviour the gate runs
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Attempt to sign in
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        if validate_credentials(email, password).is_err() {
            return false;
        }
        let email = email.trim();

        match self.variant {
            Variant::Demo => {
                self.state = AuthState::signed_in(email);
                tracing::info!(email, "Signed in (demo)");
                true
            }
            Variant::Full => {
                let credentials = Credentials::new(email, password);
                match self.api.login(&credentials).await {
                    Ok(token) => {
                        if let Err(e) = self
                            .store
                            .set(TOKEN_KEY, &token)
                            .and_then(|()| self.store.set(EMAIL_KEY, email))
                        {
                            tracing::warn!(error = %e, "Could not persist session");
                        }
                        self.api.set_bearer_token(Some(token));
                        self.state = AuthState::signed_in(email);
                        tracing::info!(email, "Signed in");
                        true
                    }
                    Err(e) => {
                        tracing::warn!(email, error = %e, "Login rejected");
                        false
                    }
                }
            }
        }
    }

    /// Sign out and forget the persisted session
    pub fn logout(&mut self) {
        for key in [TOKEN_KEY, EMAIL_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Could not clear persisted session");
            }
        }
        self.api.set_bearer_token(None);
        self.state = AuthState::default();
        tracing::info!("Signed out");
    }
}
