//! Admin Dashboard Data
//!
//! Placeholder metrics for the dashboard page. The backend has no analytics
//! endpoint, so these figures are fixed.

/// Page heading
pub const TITLE: &str = "Dashboard";

/// Page subheading
pub const SUBTITLE: &str = "Monitor your AI chatbot performance and analytics";

/// A headline metric
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatCard {
    /// Metric name
    pub title: &'static str,
    /// Formatted value
    pub value: &'static str,
    /// Period or qualifier
    pub description: &'static str,
}

/// A recent chat shown on the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecentConversation {
    /// Who asked
    pub user: &'static str,
    /// First message
    pub message: &'static str,
    /// Relative time
    pub time: &'static str,
}

/// Health of a backend service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceHealth {
    /// Working normally
    Operational,
    /// Busy with background work
    Processing,
}

impl ServiceHealth {
    /// Badge text
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Operational => "Operational",
            Self::Processing => "Processing",
        }
    }
}

/// A row of the system status card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceStatus {
    /// Service name
    pub service: &'static str,
    /// Current health
    pub health: ServiceHealth,
}

/// Headline metrics
pub const STATS: [StatCard; 4] = [
    StatCard {
        title: "Knowledge Sources",
        value: "12",
        description: "Documents indexed",
    },
    StatCard {
        title: "Conversations",
        value: "847",
        description: "This month",
    },
    StatCard {
        title: "Active Users",
        value: "156",
        description: "Last 24 hours",
    },
    StatCard {
        title: "Response Time",
        value: "0.8s",
        description: "Average response",
    },
];

/// Latest user interactions
pub const RECENT_CONVERSATIONS: [RecentConversation; 4] = [
    RecentConversation {
        user: "Anonymous User",
        message: "How do I reset my password?",
        time: "2 minutes ago",
    },
    RecentConversation {
        user: "Anonymous User",
        message: "What are your business hours?",
        time: "15 minutes ago",
    },
    RecentConversation {
        user: "Anonymous User",
        message: "Can you help me with pricing?",
        time: "1 hour ago",
    },
    RecentConversation {
        user: "Anonymous User",
        message: "I need technical support",
        time: "2 hours ago",
    },
];

/// System status rows
pub const SERVICES: [ServiceStatus; 4] = [
    ServiceStatus {
        service: "AI Model",
        health: ServiceHealth::Operational,
    },
    ServiceStatus {
        service: "Knowledge Base",
        health: ServiceHealth::Operational,
    },
    ServiceStatus {
        service: "Chat API",
        health: ServiceHealth::Operational,
    },
    ServiceStatus {
        service: "File Processing",
        health: ServiceHealth::Processing,
    },
];
