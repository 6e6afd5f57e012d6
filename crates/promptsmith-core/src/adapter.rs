//! A single generation call, streamed or buffered.
//!
//! [`Adapter`] binds a [`GenerationBackend`] to the sampling settings in
//! [`RefinerConfig`]. Streamed calls forward each fragment to a
//! [`FragmentSink`] as it arrives and return the concatenation, so the
//! streamed and buffered paths yield the same text.

use std::sync::Arc;

use promptsmith_llm::{
    ChatRequest, GenerateRequest, GenerationBackend, GenerationOptions, ProviderError, StreamChunk,
    spawn_keep_warm,
};
use promptsmith_types::{ModelChoice, RefinerConfig, Turn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

const STREAM_BUFFER: usize = 64;

/// Receives generated text as it streams in.
pub trait FragmentSink: Send {
    /// Called once per non-empty fragment, in order.
    fn fragment(&mut self, text: &str);

    /// Called when the cascade abandons the first attempt.
    fn fallback(&mut self, _choice: &ModelChoice) {}
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl FragmentSink for Silent {
    fn fragment(&mut self, _text: &str) {}
}

/// Collects fragments into a list. Handy for tests and buffering callers.
impl FragmentSink for Vec<String> {
    fn fragment(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Generation calls bound to one backend and one config.
#[derive(Clone)]
pub struct Adapter {
    backend: Arc<dyn GenerationBackend>,
    config: Arc<RefinerConfig>,
}

impl Adapter {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: Arc<RefinerConfig>) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Sampling options from config with the given context size.
    pub fn options(&self, num_ctx: u32) -> GenerationOptions {
        GenerationOptions::new(self.config.temperature, self.config.top_p, num_ctx)
    }

    /// Run one generation on `choice`.
    ///
    /// With `stream` set, fragments go to `sink` as they arrive. Without
    /// it the sink is not called and the text arrives all at once.
    pub async fn run_once(
        &self,
        choice: &ModelChoice,
        prompt: &str,
        stream: bool,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, ProviderError> {
        let request = GenerateRequest::new(&choice.model, prompt, self.options(choice.num_ctx));

        if !stream {
            return self.backend.generate(&request).await;
        }

        let (tx, rx) = mpsc::channel::<StreamChunk>(STREAM_BUFFER);
        let (result, text) = tokio::join!(
            self.backend.generate_stream(&request, tx),
            drain(rx, sink)
        );
        result?;
        Ok(text)
    }

    /// Stream a multi-turn chat reply, capped at `num_predict` tokens.
    pub async fn chat_stream(
        &self,
        choice: &ModelChoice,
        turns: &[Turn],
        num_predict: u32,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest::new(
            &choice.model,
            turns.to_vec(),
            self.options(choice.num_ctx).with_num_predict(num_predict),
        );

        let (tx, rx) = mpsc::channel::<StreamChunk>(STREAM_BUFFER);
        let (result, text) = tokio::join!(self.backend.chat_stream(&request, tx), drain(rx, sink));
        result?;
        Ok(text)
    }

    /// Fire a detached keep-warm preload for `model`.
    pub fn preload_keepalive(&self, model: &str) -> JoinHandle<()> {
        debug!(model = %model, keep_alive = %self.config.keep_alive, "spawning keep-warm");
        spawn_keep_warm(
            Arc::clone(&self.backend),
            model.to_string(),
            self.config.keep_alive.clone(),
        )
    }
}

async fn drain(mut rx: mpsc::Receiver<StreamChunk>, sink: &mut dyn FragmentSink) -> String {
    let mut text = String::new();
    while let Some(chunk) = rx.recv().await {
        if let StreamChunk::TextDelta { text: fragment } = chunk {
            sink.fragment(&fragment);
            text.push_str(&fragment);
        }
    }
    text
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("backend", &self.backend.name())
            .field("base_url", &self.backend.base_url())
            .finish()
    }
}
