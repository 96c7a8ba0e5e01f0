//! Routing
//!
//! Maps location paths to pages and applies the admin guard.
//!
//! # Design Philosophy
//!
//! Resolution is a pure function of the path, the auth state, and where the
//! user was headed. The `Desk` follows redirects; the router only says where
//! to go next.

use serde::{Deserialize, Serialize};

use crate::auth::AuthState;

/// Where the login page sends the user when no destination was recorded
pub const DEFAULT_AFTER_LOGIN: &str = "/admin/dashboard";

/// A renderable page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    /// `/`
    Landing,
    /// `/chat`
    ChatDemo,
    /// `/login`
    Login,
    /// `/admin/dashboard`
    Dashboard,
    /// `/admin/knowledge-base`
    KnowledgeBase,
    /// `/admin/settings`
    Settings,
    /// Anything else
    NotFound,
}

impl Page {
    /// Canonical path
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::ChatDemo => "/chat",
            Self::Login => "/login",
            Self::Dashboard => "/admin/dashboard",
            Self::KnowledgeBase => "/admin/knowledge-base",
            Self::Settings => "/admin/settings",
            Self::NotFound => "/404",
        }
    }

    /// Heading / navigation label
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Landing => "AI Chatbot Management System",
            Self::ChatDemo => "AI-Powered Chat Assistant",
            Self::Login => "Admin Login",
            Self::Dashboard => "Dashboard",
            Self::KnowledgeBase => "Knowledge Base",
            Self::Settings => "Settings",
            Self::NotFound => "Page Not Found",
        }
    }

    /// Whether the page needs a signed-in user
    #[must_use]
    pub fn is_protected(self) -> bool {
        self.is_admin()
    }

    /// Whether the page is part of the admin panel
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Dashboard | Self::KnowledgeBase | Self::Settings)
    }

    /// Whether the floating chat widget is offered on this page
    ///
    /// Hidden on the login page and the admin panel, except the dashboard,
    /// which embeds its own widget for testing.
    #[must_use]
    pub fn shows_chat_widget(self) -> bool {
        match self {
            Self::Login | Self::KnowledgeBase | Self::Settings => false,
            Self::Landing | Self::ChatDemo | Self::Dashboard | Self::NotFound => true,
        }
    }

    /// Admin sidebar entries, in order
    pub const ADMIN_NAV: [Self; 3] = [Self::Dashboard, Self::KnowledgeBase, Self::Settings];
}

/// Outcome of resolving a path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Show this page
    Render(Page),
    /// Go somewhere else first
    Redirect {
        /// Target path
        to: String,
        /// Destination to remember for after login
        from: Option<String>,
    },
}

/// Path-to-page table with the admin guard
#[derive(Clone, Copy, Debug)]
pub struct Router {
    admin_panel: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Router {
    /// Create a router; `admin_panel = false` hides the admin paths and login
    #[must_use]
    pub fn new(admin_panel: bool) -> Self {
        Self { admin_panel }
    }

    /// Whether admin paths resolve at all
    #[must_use]
    pub fn admin_panel(&self) -> bool {
        self.admin_panel
    }

    /// Resolve `path` for the given auth state
    ///
    /// `from` is the destination recorded by an earlier guard redirect.
    #[must_use]
    pub fn resolve(&self, path: &str, auth: &AuthState, from: Option<&str>) -> Resolution {
        let path = normalize(path);

        let page = match path.as_str() {
            "/" if self.admin_panel => Page::Landing,
            "/" | "/chat" => Page::ChatDemo,
            "/admin" if self.admin_panel => {
                return Resolution::Redirect {
                    to: Page::Dashboard.path().to_string(),
                    from: from.map(str::to_string),
                };
            }
            "/login" if self.admin_panel => Page::Login,
            "/admin/dashboard" if self.admin_panel => Page::Dashboard,
            "/admin/knowledge-base" if self.admin_panel => Page::KnowledgeBase,
            "/admin/settings" if self.admin_panel => Page::Settings,
            _ => Page::NotFound,
        };

        if page.is_protected() && !auth.is_authenticated {
            return Resolution::Redirect {
                to: Page::Login.path().to_string(),
                from: Some(path),
            };
        }

        if page == Page::Login && auth.is_authenticated {
            return Resolution::Redirect {
                to: from.unwrap_or(DEFAULT_AFTER_LOGIN).to_string(),
                from: None,
            };
        }

        Resolution::Render(page)
    }
}

/// Drop query, fragment and trailing slashes; empty becomes `/`
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = path.split(|c| c == '?' || c == '#').next().unwrap_or_default().trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn anonymous() -> AuthState {
        AuthState::default()
    }

    fn admin() -> AuthState {
        AuthState::signed_in("admin@example.com")
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/chat/"), "/chat");
        assert_eq!(normalize("admin/settings"), "/admin/settings");
        assert_eq!(normalize("/login?next=x"), "/login");
        assert_eq!(normalize("/admin//"), "/admin");
    }

    #[test]
    fn test_public_pages() {
        let router = Router::default();
        assert_eq!(router.resolve("/", &anonymous(), None), Resolution::Render(Page::Landing));
        assert_eq!(
            router.resolve("/chat/", &anonymous(), None),
            Resolution::Render(Page::ChatDemo)
        );
        assert_eq!(
            router.resolve("/nowhere", &anonymous(), None),
            Resolution::Render(Page::NotFound)
        );
    }

    #[test]
    fn test_guard_redirects_and_remembers_destination() {
        let router = Router::default();
        assert_eq!(
            router.resolve("/admin/settings", &anonymous(), None),
            Resolution::Redirect {
                to: "/login".to_string(),
                from: Some("/admin/settings".to_string()),
            }
        );
    }

    #[test]
    fn test_authenticated_renders_directly() {
        let router = Router::default();
        assert_eq!(
            router.resolve("/admin/knowledge-base", &admin(), None),
            Resolution::Render(Page::KnowledgeBase)
        );
    }

    #[test]
    fn test_admin_root_redirects_to_dashboard() {
        let router = Router::default();
        assert_eq!(
            router.resolve("/admin", &anonymous(), None),
            Resolution::Redirect {
                to: "/admin/dashboard".to_string(),
                from: None,
            }
        );
    }

    #[test]
    fn test_login_when_signed_in_goes_to_destination() {
        let router = Router::default();
        assert_eq!(
            router.resolve("/login", &admin(), Some("/admin/settings")),
            Resolution::Redirect {
                to: "/admin/settings".to_string(),
                from: None,
            }
        );
        assert_eq!(
            router.resolve("/login", &admin(), None),
            Resolution::Redirect {
                to: DEFAULT_AFTER_LOGIN.to_string(),
                from: None,
            }
        );
        assert_eq!(
            router.resolve("/login", &anonymous(), Some("/admin/settings")),
            Resolution::Render(Page::Login)
        );
    }

    #[test]
    fn test_showcase_hides_admin() {
        let router = Router::new(false);
        for path in ["/login", "/admin", "/admin/dashboard", "/admin/settings"] {
            assert_eq!(
                router.resolve(path, &admin(), None),
                Resolution::Render(Page::NotFound),
                "{path}"
            );
        }
        assert_eq!(router.resolve("/chat", &anonymous(), None), Resolution::Render(Page::ChatDemo));
    }

    #[test]
    fn test_showcase_opens_on_chat() {
        assert_eq!(
            Router::new(false).resolve("/", &anonymous(), None),
            Resolution::Render(Page::ChatDemo)
        );
        assert_eq!(
            Router::new(true).resolve("/", &anonymous(), None),
            Resolution::Render(Page::Landing)
        );
    }

    #[test]
    fn test_chat_widget_visibility() {
        assert!(Page::Landing.shows_chat_widget());
        assert!(Page::Dashboard.shows_chat_widget());
        assert!(!Page::Login.shows_chat_widget());
        assert!(!Page::KnowledgeBase.shows_chat_widget());
        assert!(!Page::Settings.shows_chat_widget());
    }
}
