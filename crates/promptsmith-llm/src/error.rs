//! Backend error types for promptsmith-llm.
//!
//! All backend operations return [`Result<T>`] which uses [`ProviderError`]
//! as the error type.

use thiserror::Error;

/// Errors that can occur when talking to the generation server.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request failed: connection refused, non-2xx status, or an
    /// in-band `{"error": ...}` line in the response body.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The server does not have the requested model (HTTP 404).
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The server returned a body that could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("timeout")]
    Timeout,

    /// An HTTP-level error from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    /// Classify a transport error from reqwest.
    ///
    /// Timeouts and refused connections get their own variants so callers
    /// can print something more useful than the raw reqwest chain.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() {
            ProviderError::RequestFailed(format!("connection failed: {err}"))
        } else {
            ProviderError::Http(err)
        }
    }
}

/// A convenience type alias for backend operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
