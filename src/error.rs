//! Error types for backend communication

use thiserror::Error;

/// Failure of a single call to the archive backend.
///
/// Kept `Clone` so results can be carried inside UI messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Request { status: u16, message: String },

    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered 2xx but reported `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build a request error from the status and an optional `detail` message
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("HTTP Error: {}", status));
        ApiError::Request { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}
