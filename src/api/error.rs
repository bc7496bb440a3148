//! Backend error types

use thiserror::Error;

/// Backend request error with classification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Status(code), message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Transport-level failure (including non-success statuses)
    pub fn is_network_failure(&self) -> bool {
        self.kind.is_network_failure()
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection refused, timeout, broken body stream
    Network,
    /// Server answered with a non-2xx status
    Status(u16),
    /// Body was not the JSON shape we expect
    Parse,
}

impl ApiErrorKind {
    pub fn is_network_failure(self) -> bool {
        matches!(self, Self::Network | Self::Status(_))
    }

    /// Short label used in structured logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Status(_) => "status",
            Self::Parse => "parse",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::network(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            ApiError::network(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            ApiError::parse(format!("Failed to decode response: {e}"))
        } else {
            ApiError::network(format!("Request failed: {e}"))
        }
    }
}
