//! Connection settings for the generation server.

use serde::{Deserialize, Serialize};

/// Where Ollama listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// How to reach an Ollama server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Server root, without a trailing slash (e.g. `http://localhost:11434`).
    pub base_url: String,

    /// Whole-request timeout in seconds. `None` waits indefinitely, which is
    /// the default: large models can take minutes on a cold start.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: None,
        }
    }
}

impl OllamaConfig {
    /// Build a config from an optional host string, normalizing it.
    pub fn from_base_url(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .and_then(normalize_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            timeout_secs: None,
        }
    }
}

/// Normalize a host value as users write it in `OLLAMA_HOST`.
///
/// A bare `host:port` gains an `http://` scheme; trailing slashes are
/// dropped. Blank input yields `None`.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("http://{trimmed}"))
    }
}
