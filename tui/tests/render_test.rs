//! Render Tests for the Botdesk TUI
//!
//! These tests drive an `App` with synthetic key presses and render it into
//! ratatui's `TestBackend`, using a mock backend in place of the server.
//!
//! # Test Coverage
//!
//! 1. **Public pages**: landing, chat demo, not found
//! 2. **Chat window**: open, send, reply rendered, close
//! 3. **Admin panel**: login flow, knowledge base, settings save

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::time::timeout;

use botdesk_tui::App;
use desk_core::{
    ApiError, Credentials, DeskApi, DeskConfig, IndexStatus, KnowledgeItem, KnowledgeType,
    MemoryTokenStore, Page, UploadRequest, Variant, WELCOME_MESSAGE,
};

// ============================================================================
// Mock Backend
// ============================================================================

#[derive(Default)]
struct MockApi {
    chat_count: Arc<AtomicUsize>,
    sources: Arc<Mutex<Vec<KnowledgeItem>>>,
    delete_count: Arc<AtomicUsize>,
}

#[async_trait]
impl DeskApi for MockApi {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn chat(&self, question: &str) -> Result<String, ApiError> {
        self.chat_count.fetch_add(1, Ordering::SeqCst);
        Ok(format!("You asked: {question}"))
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        if credentials.password == "secret" {
            Ok("token".to_string())
        } else {
            Err(ApiError::from_status(401))
        }
    }

    async fn upload(&self, _request: &UploadRequest) -> Result<(), ApiError> {
        Ok(())
    }

    async fn list_sources(&self) -> Result<Vec<KnowledgeItem>, ApiError> {
        Ok(self.sources.lock().unwrap().clone())
    }

    async fn delete_source(&self, id: &str) -> Result<(), ApiError> {
        self.delete_count.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().unwrap().retain(|item| item.id != id);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn app(variant: Variant, path: &str) -> App<MockApi> {
    app_with(MockApi::default(), variant, path).await
}

async fn app_with(api: MockApi, variant: Variant, path: &str) -> App<MockApi> {
    let config = DeskConfig::default()
        .with_variant(variant)
        .with_save_delay(Duration::from_millis(10));
    let mut app = App::new(api, Arc::new(MemoryTokenStore::new()), config);
    app.start(path).await.expect("start");
    app
}

fn render(app: &mut App<MockApi>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
    terminal.draw(|frame| app.draw(frame)).expect("draw");
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

async fn type_text(app: &mut App<MockApi>, text: &str) {
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c))).await;
    }
}

async fn settle(app: &mut App<MockApi>) {
    timeout(Duration::from_secs(5), app.settle())
        .await
        .expect("background work should finish");
}

// ============================================================================
// Public pages
// ============================================================================

#[tokio::test]
async fn test_landing_page_renders() {
    let mut app = app(Variant::Demo, "/").await;
    let screen = render(&mut app);

    assert!(screen.contains("AI Chatbot Management System"));
    assert!(screen.contains("Smart Chat Widget"));
    assert!(screen.contains("Signed in as admin@chatbot.local"));
}

#[tokio::test]
async fn test_not_found_page() {
    let mut app = app(Variant::Demo, "/nowhere").await;
    let screen = render(&mut app);
    assert!(screen.contains("Page Not Found"));
    assert!(screen.contains("/nowhere"));

    app.handle_key(key(KeyCode::Enter)).await;
    assert_eq!(app.desk().page(), Page::Landing);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_demo_round_trip() {
    let mut app = app(Variant::Demo, "/").await;
    app.handle_key(key(KeyCode::Char('c'))).await;
    assert_eq!(app.desk().page(), Page::ChatDemo);
    assert!(app.display().chat_open);

    let screen = render(&mut app);
    assert!(screen.contains("Try asking:"));
    assert!(screen.contains("Type your message..."));

    type_text(&mut app, "hello").await;
    assert_eq!(app.ui().chat_input, "hello");
    app.handle_key(key(KeyCode::Enter)).await;
    assert!(app.ui().chat_input.is_empty());
    settle(&mut app).await;

    let screen = render(&mut app);
    assert!(screen.contains("You asked: hello"));
    let messages = app.desk().chat().map(|c| c.messages().len());
    assert_eq!(messages, Some(3));
}

#[tokio::test]
async fn test_floating_chat_window_toggles() {
    let mut app = app(Variant::Demo, "/").await;
    app.handle_key(key(KeyCode::F(4))).await;
    assert!(app.display().chat_open);

    let screen = render(&mut app);
    // Welcome text wraps inside the narrow window; check its start
    assert!(screen.contains(&WELCOME_MESSAGE[..6]));
    assert!(screen.contains("AI Assistant"));

    app.handle_key(key(KeyCode::Esc)).await;
    assert!(!app.display().chat_open);
    assert_eq!(app.desk().page(), Page::Landing);
}

#[tokio::test]
async fn test_blank_chat_sends_nothing() {
    let mut app = app(Variant::Demo, "/chat").await;
    type_text(&mut app, "   ").await;
    app.handle_key(key(KeyCode::Enter)).await;
    settle(&mut app).await;

    assert_eq!(app.desk().chat().map(|c| c.messages().len()), Some(1));
}

// ============================================================================
// Admin panel
// ============================================================================

#[tokio::test]
async fn test_login_flow_lands_on_dashboard() {
    let mut app = app(Variant::Full, "/").await;
    app.handle_key(key(KeyCode::Char('a'))).await;
    assert_eq!(app.desk().page(), Page::Login);
    assert!(render(&mut app).contains("Admin Login"));

    type_text(&mut app, "admin@example.com").await;
    app.handle_key(key(KeyCode::Tab)).await;
    type_text(&mut app, "secret").await;

    let screen = render(&mut app);
    assert!(screen.contains("••••••"));
    assert!(!screen.contains("secret"));

    app.handle_key(key(KeyCode::Enter)).await;
    assert_eq!(app.desk().page(), Page::Dashboard);
    assert!(app.ui().login_email.is_empty());

    let screen = render(&mut app);
    assert!(screen.contains("Recent Conversations"));
    assert!(screen.contains("847"));
    assert!(screen.contains("Signed in as admin@example.com"));
}

#[tokio::test]
async fn test_wrong_password_shows_toast() {
    let mut app = app(Variant::Full, "/login").await;
    type_text(&mut app, "admin@example.com").await;
    app.handle_key(key(KeyCode::Tab)).await;
    type_text(&mut app, "nope").await;
    app.handle_key(key(KeyCode::Enter)).await;

    assert_eq!(app.desk().page(), Page::Login);
    let screen = render(&mut app);
    assert!(screen.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_knowledge_base_empty_state() {
    let mut app = app(Variant::Demo, "/admin/knowledge-base").await;
    settle(&mut app).await;

    let screen = render(&mut app);
    assert!(screen.contains("No knowledge sources"));
    assert!(screen.contains("Selected Files (0)"));

    app.handle_key(ctrl('u')).await;
    let screen = render(&mut app);
    assert!(screen.contains("No files or URL to upload."));
}

fn source(name: &str) -> KnowledgeItem {
    KnowledgeItem {
        id: name.to_string(),
        name: name.to_string(),
        kind: KnowledgeType::Pdf,
        status: IndexStatus::Indexed,
        date_added: "2024-01-15 10:30:00".to_string(),
        size: None,
    }
}

#[tokio::test]
async fn test_delete_source_asks_for_confirmation() {
    let api = MockApi::default();
    api.sources.lock().unwrap().push(source("handbook.pdf"));
    let deletes = Arc::clone(&api.delete_count);
    let mut app = app_with(api, Variant::Demo, "/admin/knowledge-base").await;
    settle(&mut app).await;
    assert!(render(&mut app).contains("handbook.pdf"));

    for _ in 0..3 {
        app.handle_key(key(KeyCode::Tab)).await;
    }
    app.handle_key(key(KeyCode::Char('d'))).await;
    settle(&mut app).await;

    let screen = render(&mut app);
    assert!(screen.contains("Delete Knowledge Source"));
    assert!(screen.contains("Are you sure you want to delete"));
    assert_eq!(deletes.load(Ordering::SeqCst), 0);

    // n cancels
    app.handle_key(key(KeyCode::Char('n'))).await;
    settle(&mut app).await;
    let screen = render(&mut app);
    assert!(!screen.contains("Delete Knowledge Source"));
    assert!(screen.contains("handbook.pdf"));
    assert_eq!(deletes.load(Ordering::SeqCst), 0);

    // other keys leave the dialog up
    app.handle_key(key(KeyCode::Char('d'))).await;
    app.handle_key(key(KeyCode::Down)).await;
    assert!(render(&mut app).contains("Delete Knowledge Source"));
    assert_eq!(deletes.load(Ordering::SeqCst), 0);

    app.handle_key(key(KeyCode::Char('y'))).await;
    settle(&mut app).await;
    assert_eq!(deletes.load(Ordering::SeqCst), 1);
    let screen = render(&mut app);
    assert!(!screen.contains("Delete Knowledge Source"));
    assert!(screen.contains("No knowledge sources"));
}

#[tokio::test]
async fn test_settings_save() {
    let mut app = app(Variant::Demo, "/admin/settings").await;
    assert!(render(&mut app).contains("All changes saved"));

    type_text(&mut app, "!").await;
    assert!(render(&mut app).contains("Unsaved changes"));

    app.handle_key(ctrl('s')).await;
    settle(&mut app).await;

    let screen = render(&mut app);
    assert!(screen.contains("All changes saved"));
    assert!(screen.contains("Settings saved"));
    assert_eq!(app.desk().settings().saved().bot_name, "AI Assistant!");
}

#[tokio::test]
async fn test_sign_out_key() {
    let mut app = app(Variant::Demo, "/admin/dashboard").await;
    app.handle_key(key(KeyCode::F(9))).await;

    assert_eq!(app.desk().page(), Page::Login);
    assert!(!app.display().authenticated);
}

#[tokio::test]
async fn test_ctrl_c_quits() {
    let mut app = app(Variant::Demo, "/").await;
    app.handle_key(ctrl('c')).await;
    assert!(!app.is_running());
}
