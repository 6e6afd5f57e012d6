//! Configuration schema types.
//!
//! [`ConfigFile`] mirrors the on-disk `config.yaml` layout:
//!
//! ```yaml
//! ollama:
//!   model: gpt-oss:20b
//!   temperature: 0.3
//!   top_p: 0.9
//!   num_ctx: 2048
//!   keep_alive: 30m
//! refiner:
//!   max_bullets: 10
//! ```
//!
//! Every field has a default, so a partial (or empty) document is valid.
//! Unknown keys are silently ignored. [`ConfigFile::into_app_config`] folds
//! the sections into the immutable runtime objects handed to each component.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// System turn used by the console shell's raw chat mode.
pub const DEFAULT_SHELL_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant. \
    Answer in the user's language. \
    Do NOT repeat the user's message. \
    Provide a direct, useful answer.";

// ── Runtime config ───────────────────────────────────────────────────────

/// Settings for prompt refinement and the generation backend.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinerConfig {
    /// Model used by the `max` profile, the shell, and as the default target.
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Nucleus-sampling cutoff in `[0, 1]`.
    pub top_p: f32,
    /// Context window in tokens. Always positive.
    pub num_ctx: u32,
    /// Maximum number of sections the refined prompt may contain.
    pub max_bullets: u32,
    /// Backend base URL. `None` means the backend default.
    pub base_url: Option<String>,
    /// How long the backend should keep a preloaded model resident.
    pub keep_alive: String,
    /// Model used by the cascade's single fallback attempt.
    pub fallback_model: String,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            num_ctx: default_num_ctx(),
            max_bullets: default_max_bullets(),
            base_url: None,
            keep_alive: default_keep_alive(),
            fallback_model: default_fallback_model(),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Console shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Token cap for raw chat replies.
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,
    /// Directory for timestamped `/save` transcripts.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    /// System turn that seeds (and `/reset` restores) the conversation.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            num_predict: default_num_predict(),
            logs_dir: default_logs_dir(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Everything a promptsmith process needs, resolved from file + environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Refinement and backend settings.
    pub refiner: RefinerConfig,
    /// Directory holding `system_uz.txt`, `system_ru.txt`, `modes.yaml`.
    pub templates_dir: PathBuf,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Console shell settings.
    pub shell: ShellConfig,
}

// ── On-disk schema ───────────────────────────────────────────────────────

/// Root of `config.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Backend model and sampling parameters.
    #[serde(default)]
    pub ollama: OllamaSection,

    /// Refinement settings.
    #[serde(default)]
    pub refiner: RefinerSection,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Console shell settings.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// The `ollama:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSection {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_num_ctx")]
    pub num_ctx: u32,

    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            num_ctx: default_num_ctx(),
            keep_alive: default_keep_alive(),
        }
    }
}

/// The `refiner:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinerSection {
    #[serde(default = "default_max_bullets")]
    pub max_bullets: u32,

    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

impl Default for RefinerSection {
    fn default() -> Self {
        Self {
            max_bullets: default_max_bullets(),
            fallback_model: default_fallback_model(),
            templates_dir: default_templates_dir(),
        }
    }
}

impl ConfigFile {
    /// Fold the file sections into runtime config.
    ///
    /// `base_url` comes from the environment, not the file. Out-of-range
    /// values are replaced by defaults (zero sizes, blank model names) or
    /// clamped (temperature and top_p).
    pub fn into_app_config(self, base_url: Option<String>) -> AppConfig {
        let ConfigFile {
            ollama,
            refiner,
            server,
            shell,
        } = self;

        let refiner_config = RefinerConfig {
            model: non_blank(ollama.model, default_model),
            temperature: ollama.temperature.clamp(0.0, 1.0),
            top_p: ollama.top_p.clamp(0.0, 1.0),
            num_ctx: non_zero(ollama.num_ctx, default_num_ctx),
            max_bullets: non_zero(refiner.max_bullets, default_max_bullets),
            base_url,
            keep_alive: non_blank(ollama.keep_alive, default_keep_alive),
            fallback_model: non_blank(refiner.fallback_model, default_fallback_model),
        };

        AppConfig {
            refiner: refiner_config,
            templates_dir: refiner.templates_dir,
            server,
            shell: ShellConfig {
                num_predict: non_zero(shell.num_predict, default_num_predict),
                ..shell
            },
        }
    }
}

fn non_blank(value: String, fallback: fn() -> String) -> String {
    if value.trim().is_empty() {
        fallback()
    } else {
        value
    }
}

fn non_zero(value: u32, fallback: fn() -> u32) -> u32 {
    if value == 0 { fallback() } else { value }
}

fn default_model() -> String {
    "gpt-oss:20b".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.9
}
fn default_num_ctx() -> u32 {
    2048
}
fn default_max_bullets() -> u32 {
    10
}
fn default_keep_alive() -> String {
    "30m".into()
}
fn default_fallback_model() -> String {
    "gpt-oss:20b".into()
}
fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_num_predict() -> u32 {
    512
}
fn default_logs_dir() -> PathBuf {
    PathBuf::from("data/logs")
}
fn default_system_prompt() -> String {
    DEFAULT_SHELL_SYSTEM_PROMPT.into()
}
