//! Error types for backend API calls.

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
///
/// Every variant is recoverable: callers render a placeholder and offer a
/// manual retry rather than aborting.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Request exceeded the configured deadline
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Backend unreachable (DNS, connection refused, reset)
    #[error("connection failed: {0}")]
    Connection(String),

    /// Backend answered with a non-2xx status
    #[error("server responded with status: {0}")]
    Http(u16),

    /// Body was not the JSON shape we expected
    #[error("invalid response: {0}")]
    Decode(String),

    /// Backend reported an error payload (`{"error": "..."}`), kept verbatim
    #[error("{0}")]
    Backend(String),

    /// Client could not be constructed
    #[error("client configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Classify a transport-level reqwest error.
    pub fn from_reqwest(err: reqwest::Error, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout_seconds)
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http(status.as_u16())
        } else {
            ApiError::Connection(err.to_string())
        }
    }

    /// True for failures of the network path itself, as opposed to a
    /// backend that answered with something we could not use.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout(_) | ApiError::Connection(_) | ApiError::Http(_)
        )
    }
}
