//! Botdesk TUI Entry Point
//!
//! Launches the terminal surface for the chatbot admin client.
//!
//! Usage:
//!   botdesk-tui [OPTIONS]
//!
//! Options:
//!   --api-url <URL>        Chatbot server base URL
//!   --variant <VARIANT>    demo (auto sign-in) or full (server login)
//!   --config <FILE>        Configuration file
//!   --start-path <PATH>    Page to open first (default: /)

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use botdesk_tui::App;
use desk_core::{
    default_config_path, load_config_from_path, ConfigOverrides, FileTokenStore, HttpApi,
    MemoryTokenStore, TokenStore, Variant,
};

#[derive(Parser, Debug)]
#[command(name = "botdesk-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chatbot server base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Client variant
    #[arg(long, value_name = "VARIANT")]
    variant: Option<Variant>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "BOTDESK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page to open first
    #[arg(long, default_value = "/", value_name = "PATH")]
    start_path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: botdesk-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or the session has no TTY");
        eprintln!("(for ssh, pass -t).");
        std::process::exit(1);
    }

    let log_path = init_logging()?;

    let mut config = load_config_from_path(args.config.clone().or_else(default_config_path))
        .context("Failed to load configuration")?;
    let mut overrides = ConfigOverrides::new();
    if let Some(url) = args.api_url {
        overrides = overrides.with_api_url(url);
    }
    if let Some(variant) = args.variant {
        overrides = overrides.with_variant(variant);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        source = %config.source(),
        variant = %config.variant,
        log = %log_path.display(),
        "botdesk-tui starting"
    );

    let store = token_store(config.variant);
    let api = HttpApi::new(&config.api).context("Failed to build HTTP client")?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(api, store, config);
    let result = app.run(&mut terminal, &args.start_path).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Full runs keep the session across restarts; the demo signs in anyway
fn token_store(variant: Variant) -> Arc<dyn TokenStore> {
    if variant == Variant::Demo {
        return Arc::new(MemoryTokenStore::new());
    }
    let Some(path) = FileTokenStore::default_path() else {
        tracing::warn!("No data directory, session will not persist");
        return Arc::new(MemoryTokenStore::new());
    };
    match FileTokenStore::open(path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "Could not open session file, session will not persist");
            Arc::new(MemoryTokenStore::new())
        }
    }
}

/// Log to a file so output never lands on the alternate screen
fn init_logging() -> anyhow::Result<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("botdesk");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let path = dir.join("botdesk.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    Ok(path)
}
