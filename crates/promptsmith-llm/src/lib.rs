//! Generation backend abstraction for promptsmith.
//!
//! This crate wraps the single external dependency of the refiner: a
//! local text-generation server speaking the Ollama HTTP API.
//!
//! # Architecture
//!
//! - [`GenerationBackend`] trait defines generate / stream / chat / preload
//! - [`OllamaBackend`] implements it over `reqwest`
//! - [`parse_ndjson_line`] decodes one line of a streamed response
//! - [`LineBuffer`] reassembles lines from arbitrary byte chunks
//! - [`spawn_keep_warm`] fires a detached, time-boxed preload
//! - [`OllamaConfig`] describes how to reach the server
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptsmith_llm::{GenerateRequest, GenerationBackend, GenerationOptions, OllamaBackend};
//!
//! let backend = OllamaBackend::from_base_url(None);
//! let request = GenerateRequest::new(
//!     "qwen2.5:7b",
//!     "Explain ownership in one paragraph.",
//!     GenerationOptions::new(0.3, 0.9, 2048),
//! );
//! let text = backend.generate(&request).await?;
//! println!("{text}");
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod keep_warm;
pub mod ndjson;
pub mod ollama;
pub mod types;

pub use backend::GenerationBackend;
pub use config::{DEFAULT_BASE_URL, OllamaConfig, normalize_base_url};
pub use error::{ProviderError, Result};
pub use keep_warm::{KEEP_WARM_TIMEOUT, spawn_keep_warm};
pub use ndjson::{LineBuffer, parse_ndjson_line};
pub use ollama::OllamaBackend;
pub use types::{ChatRequest, GenerateRequest, GenerationOptions, PreloadRequest, StreamChunk};
