//! The core [`GenerationBackend`] trait.
//!
//! The refiner never talks HTTP directly; everything goes through this
//! trait so tests can substitute a scripted backend.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{ChatRequest, GenerateRequest, StreamChunk};

/// A server that can turn prompts into text.
///
/// The main implementation is
/// [`OllamaBackend`](crate::ollama::OllamaBackend).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short backend name for logs (e.g. `ollama`).
    fn name(&self) -> &str;

    /// The server root this backend talks to, for display.
    fn base_url(&self) -> &str;

    /// Run a generation and return the full text at once.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Run a streamed generation, sending each fragment to `tx` in order.
    ///
    /// Returns once the server closes the stream or the receiver is dropped.
    async fn generate_stream(
        &self,
        request: &GenerateRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<()>;

    /// Run a streamed multi-turn chat, sending each fragment to `tx`.
    async fn chat_stream(&self, request: &ChatRequest, tx: mpsc::Sender<StreamChunk>)
    -> Result<()>;

    /// Ask the server to load `model` and keep it resident for `keep_alive`.
    async fn preload(&self, model: &str, keep_alive: &str) -> Result<()>;
}
