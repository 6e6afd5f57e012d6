//! # promptsmith-types
//!
//! Core type definitions for promptsmith.
//!
//! This crate is the foundation of the dependency graph -- all other
//! promptsmith crates depend on it. It contains:
//!
//! - **[`error`]** -- [`TypesError`] for strict enum parsing
//! - **[`mode`]** -- target [`Mode`] and detected [`Lang`]
//! - **[`profile`]** -- speed/quality [`Profile`] presets
//! - **[`config`]** -- [`RefinerConfig`] and the `config.yaml` schema
//! - **[`refine`]** -- HTTP-facing request/result shapes
//! - **[`session`]** -- conversation [`Turn`]s for the console shell

pub mod config;
pub mod error;
pub mod mode;
pub mod profile;
pub mod refine;
pub mod session;

pub use config::{AppConfig, ConfigFile, RefinerConfig, ServerConfig, ShellConfig};
pub use error::{Result, TypesError};
pub use mode::{Lang, Mode};
pub use profile::{ModelChoice, Profile};
pub use refine::{RefinementRequest, RefinementResult};
pub use session::{Role, Turn};
