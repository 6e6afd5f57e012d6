//! Core engine for promptsmith.
//!
//! Turns a short informal request into a structured prompt by composing a
//! template, calling a generation backend, and optionally re-running on a
//! stronger model when the output looks thin.
//!
//! # Modules
//!
//! - [`config_loader`] -- resolve `config.yaml` + environment into [`AppConfig`](promptsmith_types::AppConfig)
//! - [`lang`] -- input language detection
//! - [`templates`] -- system prompts, mode checklists, prompt composition
//! - [`scoring`] -- structural quality heuristic
//! - [`adapter`] -- single generation call, streamed or buffered
//! - [`selector`] -- profile resolution and the quality cascade
//! - [`conversation`] -- shell conversation history and transcripts
//! - [`error`] -- error types

pub mod adapter;
pub mod config_loader;
pub mod conversation;
pub mod error;
pub mod lang;
pub mod scoring;
pub mod selector;
pub mod templates;

pub use adapter::{Adapter, FragmentSink, Silent};
pub use config_loader::load_config;
pub use conversation::{ConversationState, default_transcript_path};
pub use error::{RefineError, Result, TemplateError, TranscriptError};
pub use lang::detect_lang;
pub use scoring::{MarkerScorer, QUALITY_THRESHOLD, QualityScorer, score_output};
pub use selector::{RefineOptions, RefinementOutcome, Refiner};
pub use templates::{ComposedPrompt, TemplateStore, build_instruction, pick_system};
