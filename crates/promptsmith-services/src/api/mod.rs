//! REST API for the prompt refiner.
//!
//! Routes live in [`handlers`]. The router carries a credentialed CORS
//! layer for the known web front-ends and a request trace layer.

pub mod handlers;

use std::sync::{Arc, LazyLock};

use axum::Router;
use axum::http::HeaderValue;
use axum::http::request::Parts;
use promptsmith_core::Refiner;
use promptsmith_types::ServerConfig;
use regex::Regex;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;

/// Front-end origins allowed verbatim.
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:5500"];

/// Preview deployments, any subdomain.
static VERCEL_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://.*\.vercel\.app$").expect("static origin pattern is valid")
});

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub refiner: Arc<Refiner>,
}

impl ApiState {
    pub fn new(refiner: Arc<Refiner>) -> Self {
        Self { refiner }
    }
}

/// Whether a browser origin may call the API.
pub fn origin_allowed(origin: &str) -> bool {
    ALLOWED_ORIGINS.contains(&origin) || VERCEL_ORIGIN.is_match(origin)
}

/// CORS for the web front-ends. Credentials are allowed, so methods and
/// headers are mirrored from the preflight instead of using a wildcard.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _parts: &Parts| origin.to_str().is_ok_and(origin_allowed),
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the API router with all routes.
pub fn build_router(state: ApiState) -> Router {
    handlers::routes()
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.host:config.port` and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: ApiState) -> Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(addr = %listener.local_addr()?, "refine api listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("refine api stopped");
    Ok(())
}

async fn shutdown_signal() {
    // An install failure leaves the server running until killed.
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_origins_are_allowed() {
        assert!(origin_allowed("http://localhost:3000"));
        assert!(origin_allowed("http://127.0.0.1:5500"));
    }

    #[test]
    fn vercel_previews_are_allowed() {
        assert!(origin_allowed("https://promptsmith.vercel.app"));
        assert!(origin_allowed("https://pr-42-promptsmith.team.vercel.app"));
    }

    #[test]
    fn other_origins_are_rejected() {
        assert!(!origin_allowed("http://localhost:3001"));
        assert!(!origin_allowed("http://promptsmith.vercel.app"));
        assert!(!origin_allowed("https://vercel.app.evil.com"));
    }
}
