//! TOML Configuration File Support
//!
//! Centralized configuration loading for botdesk, supporting a TOML file at
//! `~/.config/botdesk/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the binary through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! chat_timeout_secs = 60
//! request_timeout_secs = 30
//! upload_timeout_secs = 300
//!
//! [app]
//! variant = "demo"
//! admin_panel = true
//!
//! [chat]
//! max_message_length = 1000
//!
//! [settings]
//! save_delay_ms = 1000
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::DEFAULT_CHAT_TIMEOUT;
use crate::settings::DEFAULT_SAVE_DELAY;
use crate::validation::DEFAULT_MAX_MESSAGE_LENGTH;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Which authentication behaviour to run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Auto-authenticated, no login request
    #[default]
    Demo,
    /// Token login against the backend
    Full,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown variant '{other}' (expected 'demo' or 'full')")),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "demo"),
            Self::Full => write!(f, "full"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// API section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Backend base URL
    pub base_url: Option<String>,

    /// Chat round-trip timeout in seconds
    pub chat_timeout_secs: Option<u64>,

    /// Timeout for other requests in seconds
    pub request_timeout_secs: Option<u64>,

    /// Upload timeout in seconds
    pub upload_timeout_secs: Option<u64>,
}

/// App section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppToml {
    /// `demo` or `full`
    pub variant: Option<Variant>,

    /// Whether the admin panel and login page exist
    pub admin_panel: Option<bool>,
}

/// Chat section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatToml {
    /// Longest accepted chat message, in characters
    pub max_message_length: Option<usize>,
}

/// Settings section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsToml {
    /// Stubbed save delay in milliseconds
    pub save_delay_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskToml {
    /// API configuration section
    pub api: ApiToml,

    /// App configuration section
    pub app: AppToml,

    /// Chat configuration section
    pub chat: ChatToml,

    /// Settings page configuration section
    pub settings: SettingsToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// HTTP adapter configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend base URL
    pub base_url: String,
    /// Chat round-trip timeout
    pub chat_timeout: Duration,
    /// Timeout for login, list and delete
    pub request_timeout: Duration,
    /// Timeout for knowledge-base uploads
    pub upload_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(300),
        }
    }
}

/// Centralized configuration for botdesk
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct DeskConfig {
    /// HTTP adapter settings
    pub api: ApiConfig,

    /// Authentication behaviour
    pub variant: Variant,

    /// Whether the admin panel and login page exist
    pub admin_panel: bool,

    /// Longest accepted chat message, in characters
    pub max_message_length: usize,

    /// Stubbed settings save delay
    pub save_delay: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            variant: Variant::Demo,
            admin_panel: true,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            save_delay: DEFAULT_SAVE_DELAY,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl DeskConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Builder: authentication variant
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Builder: stubbed settings save delay
    #[must_use]
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    /// Check values that would make the desk unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.api.chat_timeout.is_zero()
            || self.api.request_timeout.is_zero()
            || self.api.upload_timeout.is_zero()
        {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.max_message_length == 0 {
            return Err(ConfigError::ValidationError(
                "chat.max_message_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Environment variables read by [`load_config`]
pub const ENV_VARS: [&str; 5] = [
    "BOTDESK_API_URL",
    "BOTDESK_VARIANT",
    "BOTDESK_CHAT_TIMEOUT",
    "BOTDESK_REQUEST_TIMEOUT",
    "BOTDESK_ADMIN_PANEL",
];

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/botdesk/config.toml` or
/// `~/.config/botdesk/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("botdesk").join("config.toml"))
}

/// Load configuration from all sources except the CLI
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<DeskConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then apply the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DeskConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<DeskConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = DeskConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: DeskToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut DeskConfig, toml: &DeskToml) {
    if let Some(ref url) = toml.api.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(secs) = toml.api.chat_timeout_secs {
        config.api.chat_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.api.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.api.upload_timeout_secs {
        config.api.upload_timeout = Duration::from_secs(secs);
    }

    if let Some(variant) = toml.app.variant {
        config.variant = variant;
    }
    if let Some(enabled) = toml.app.admin_panel {
        config.admin_panel = enabled;
    }

    if let Some(length) = toml.chat.max_message_length {
        config.max_message_length = length;
    }

    if let Some(ms) = toml.settings.save_delay_ms {
        config.save_delay = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are logged and ignored.
fn apply_env_config<F>(config: &mut DeskConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env("BOTDESK_API_URL") {
        config.api.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(variant) = env("BOTDESK_VARIANT") {
        match variant.parse::<Variant>() {
            Ok(v) => {
                config.variant = v;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring BOTDESK_VARIANT"),
        }
    }
    if let Some(timeout) = env("BOTDESK_CHAT_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.api.chat_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(timeout) = env("BOTDESK_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.api.request_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(enabled) = env("BOTDESK_ADMIN_PANEL") {
        config.admin_panel = enabled != "0" && enabled.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub api_url: Option<String>,

    /// Variant override
    pub variant: Option<Variant>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set variant override
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut DeskConfig) {
        if self.api_url.is_some() || self.variant.is_some() {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref url) = self.api_url {
            config.api.base_url = url.clone();
        }

        if let Some(variant) = self.variant {
            config.variant = variant;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
