//! Configuration discovery and loading.
//!
//! Resolution order for the file:
//! 1. explicit path (CLI `--config`)
//! 2. `PROMPTSMITH_CONFIG` environment variable
//! 3. `config.yaml` in the working directory
//!
//! The file is optional. A missing file means defaults; a malformed one
//! means defaults plus a warning. `OLLAMA_HOST` always overrides the
//! backend base URL.

use std::path::{Path, PathBuf};

use promptsmith_llm::normalize_base_url;
use promptsmith_types::{AppConfig, ConfigFile};
use tracing::{debug, warn};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "PROMPTSMITH_CONFIG";

/// Environment variable naming the Ollama host.
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Config file looked up when nothing else is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Pick the config file path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV) {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Read and parse a config file, falling back to defaults on any failure.
pub fn read_config_file(path: &Path) -> ConfigFile {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return ConfigFile::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config file, using defaults");
            return ConfigFile::default();
        }
    };

    if contents.trim().is_empty() {
        return ConfigFile::default();
    }

    match serde_yaml::from_str(&contents) {
        Ok(file) => {
            debug!(path = %path.display(), "loaded config file");
            file
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed config file, using defaults");
            ConfigFile::default()
        }
    }
}

/// Base URL from `OLLAMA_HOST`, normalized.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(OLLAMA_HOST_ENV)
        .ok()
        .and_then(|h| normalize_base_url(&h))
}

/// Load the full application config from file and environment.
pub fn load_config(explicit: Option<&Path>) -> AppConfig {
    let path = resolve_config_path(explicit);
    read_config_file(&path).into_app_config(base_url_from_env())
}
