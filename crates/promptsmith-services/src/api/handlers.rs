//! HTTP request handlers for the REST API.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use promptsmith_core::{RefineOptions, Silent};
use promptsmith_types::{Profile, RefinementRequest, RefinementResult};
use tracing::debug;

use super::ApiState;
use crate::error::{ApiError, Result};

/// Greeting returned by `GET /`.
pub const ROOT_MESSAGE: &str = "AI Prompt Engineer is running 🚀";

/// Build all API routes.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/refine", post(refine))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": ROOT_MESSAGE }))
}

/// Server start time, set on the first health probe.
static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Returns basic health status, version, and uptime.
async fn health_check() -> Json<serde_json::Value> {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": start.elapsed().as_secs()
    }))
}

/// A blank profile means the default; anything else unknown is `balanced`.
fn request_profile(name: &str) -> Profile {
    if name.trim().is_empty() {
        Profile::default()
    } else {
        Profile::parse_lossy(name)
    }
}

/// One refinement: profile resolved leniently, no cascade, buffered output.
async fn refine(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<RefinementRequest>, JsonRejection>,
) -> Result<Json<RefinementResult>> {
    let Json(req) = payload?;
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".into()));
    }

    let options = RefineOptions::for_profile(request_profile(&req.profile));
    debug!(mode = %req.mode, profile = %req.profile, chars = req.text.len(), "refine request");

    let outcome = state
        .refiner
        .refine(&req.text, req.mode, &options, &mut Silent)
        .await?;

    Ok(Json(RefinementResult {
        input: req.text,
        mode: req.mode,
        profile: req.profile,
        refined: outcome.text,
    }))
}
