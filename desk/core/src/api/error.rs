//! API Error Taxonomy
//!
//! Every failure an HTTP call can produce, classified so callers can pick a
//! user-facing message without inspecting transport details.

use thiserror::Error;

/// Failure of a backend request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend could not be reached (connection refused, DNS, offline)
    #[error("backend unreachable: {0}")]
    Network(String),

    /// The request exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a 5xx status
    #[error("server error (HTTP {status})")]
    Server {
        /// HTTP status code
        status: u16,
    },

    /// The backend answered with any other non-success status
    #[error("unexpected status (HTTP {status})")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// A 2xx response whose body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client could not be built or the request could not be formed
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if (500..600).contains(&status) {
            Self::Server { status }
        } else {
            Self::Status { status }
        }
    }

    /// Whether this is a timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16())
        } else if e.is_connect() || e.is_request() {
            Self::Network(e.to_string())
        } else if e.is_decode() || e.is_body() {
            Self::MalformedResponse(e.to_string())
        } else if e.is_builder() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(500),
            ApiError::Server { status: 500 }
        ));
        assert!(matches!(
            ApiError::from_status(503),
            ApiError::Server { status: 503 }
        ));
        assert!(matches!(
            ApiError::from_status(404),
            ApiError::Status { status: 404 }
        ));
        assert!(matches!(
            ApiError::from_status(401),
            ApiError::Status { status: 401 }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::Timeout.to_string(), "request timed out");
        assert_eq!(
            ApiError::Server { status: 502 }.to_string(),
            "server error (HTTP 502)"
        );
    }
}
