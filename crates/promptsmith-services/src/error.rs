//! API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptsmith_core::RefineError;
use promptsmith_llm::ProviderError;
use thiserror::Error;
use tracing::warn;

/// Errors a handler can return.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body was well-formed JSON but not acceptable.
    #[error("{0}")]
    Validation(String),

    /// The body could not be read as a request (bad JSON, wrong content
    /// type, missing or mistyped fields).
    #[error("{}", .0.body_text())]
    Rejected(#[from] JsonRejection),

    /// The generation backend failed.
    #[error(transparent)]
    Backend(#[from] ProviderError),

    /// The listener could not be bound or the server stopped.
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RefineError> for ApiError {
    fn from(err: RefineError) -> Self {
        match err {
            RefineError::EmptyInput => ApiError::Validation("text must not be empty".into()),
            RefineError::Backend(e) => ApiError::Backend(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected(rejection) => rejection.status(),
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ApiError>;
