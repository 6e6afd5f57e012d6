//! Ollama HTTP backend.
//!
//! [`OllamaBackend`] speaks the native Ollama API (`/api/generate`,
//! `/api/chat`). Streamed bodies are newline-delimited JSON and are decoded
//! line by line with [`parse_ndjson_line`].

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::backend::GenerationBackend;
use crate::config::OllamaConfig;
use crate::error::{ProviderError, Result};
use crate::ndjson::{LineBuffer, parse_ndjson_line};
use crate::types::{ChatRequest, GenerateRequest, GenerateResponse, PreloadRequest, StreamChunk};

/// A [`GenerationBackend`] backed by an Ollama server.
///
/// ```rust,ignore
/// use promptsmith_llm::{OllamaBackend, OllamaConfig};
///
/// let backend = OllamaBackend::new(OllamaConfig::from_base_url(Some("gpu-box:11434")));
/// ```
pub struct OllamaBackend {
    config: OllamaConfig,
    http: reqwest::Client,
}

impl OllamaBackend {
    /// Create a backend from configuration.
    pub fn new(config: OllamaConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "failed to build configured HTTP client, using defaults");
            reqwest::Client::new()
        });
        Self { config, http }
    }

    /// Create a backend for an optional, not yet normalized host string.
    pub fn from_base_url(base_url: Option<&str>) -> Self {
        Self::new(OllamaConfig::from_base_url(base_url))
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}{path}")
    }

    /// POST a JSON body and map non-2xx statuses to errors.
    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        model: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body).unwrap_or(body);

        if status.as_u16() == 404 {
            return Err(ProviderError::ModelNotFound(format!(
                "model '{model}': {message}"
            )));
        }

        Err(ProviderError::RequestFailed(format!(
            "HTTP {status}: {message}"
        )))
    }

    /// Drain an NDJSON body into `tx`.
    ///
    /// Unparseable lines are skipped with a warning; an in-band error line
    /// aborts the stream.
    async fn pump(&self, response: reqwest::Response, tx: mpsc::Sender<StreamChunk>) -> Result<()> {
        let mut byte_stream = response.bytes_stream();
        let mut lines = LineBuffer::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let bytes = chunk_result
                .map_err(|e| ProviderError::RequestFailed(format!("stream read error: {e}")))?;

            for line in lines.push(&bytes) {
                if !self.forward_line(&line, &tx).await? {
                    debug!("stream receiver dropped, stopping");
                    return Ok(());
                }
            }
        }

        if let Some(rest) = lines.finish() {
            self.forward_line(&rest, &tx).await?;
        }

        debug!(backend = "ollama", "streaming complete");
        Ok(())
    }

    /// Returns `Ok(false)` once the receiver is gone.
    async fn forward_line(&self, line: &str, tx: &mpsc::Sender<StreamChunk>) -> Result<bool> {
        let chunks = match parse_ndjson_line(line) {
            Ok(c) => c,
            Err(ProviderError::InvalidResponse(e)) => {
                warn!(error = %e, "NDJSON parse error, skipping line");
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        for chunk in chunks {
            trace!(chunk = ?chunk, "streaming chunk");
            if tx.send(chunk).await.is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            model = %request.model,
            num_ctx = request.options.num_ctx,
            prompt_chars = request.prompt.chars().count(),
            "sending generate request"
        );

        let mut body = request.clone();
        body.stream = false;

        let response = self.post("/api/generate", &request.model, &body).await?;
        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        if let Some(err) = parsed.error {
            return Err(ProviderError::RequestFailed(err));
        }

        let text = parsed.response.ok_or_else(|| {
            ProviderError::InvalidResponse("missing 'response' field".into())
        })?;

        debug!(model = %request.model, chars = text.chars().count(), "generate response received");
        Ok(text)
    }

    async fn generate_stream(
        &self,
        request: &GenerateRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<()> {
        debug!(
            model = %request.model,
            num_ctx = request.options.num_ctx,
            "sending streaming generate request"
        );

        let mut body = request.clone();
        body.stream = true;

        let response = self.post("/api/generate", &request.model, &body).await?;
        self.pump(response, tx).await
    }

    async fn chat_stream(
        &self,
        request: &ChatRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<()> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending streaming chat request"
        );

        let mut body = request.clone();
        body.stream = true;

        let response = self.post("/api/chat", &request.model, &body).await?;
        self.pump(response, tx).await
    }

    async fn preload(&self, model: &str, keep_alive: &str) -> Result<()> {
        let body = PreloadRequest::new(model, keep_alive);
        self.post("/api/generate", model, &body).await?;
        debug!(model = %model, keep_alive = %keep_alive, "model preloaded");
        Ok(())
    }
}

/// Extract `error` from a JSON error body (`{"error": "..."}`).
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| v.as_str()).map(String::from)
}

impl std::fmt::Debug for OllamaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaBackend")
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
