//! Subcommand implementations and shared bootstrap helpers.

pub mod config_cmd;
pub mod refine;
pub mod serve;
pub mod shell;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use promptsmith_core::{Refiner, TemplateStore, load_config as load_app_config};
use promptsmith_llm::OllamaBackend;
use promptsmith_types::AppConfig;
use tracing::debug;

/// Load configuration from an explicit path or the usual discovery order.
///
/// Never fails: a missing or malformed file yields defaults.
pub fn load_config(config_path: Option<&str>) -> AppConfig {
    load_app_config(config_path.map(Path::new))
}

/// Wire the Ollama backend, templates and config into a [`Refiner`].
///
/// Template loading is the one fatal startup step.
pub fn build_refiner(config: &AppConfig) -> anyhow::Result<Refiner> {
    let templates = TemplateStore::load(&config.templates_dir).with_context(|| {
        format!(
            "failed to load templates from {}",
            config.templates_dir.display()
        )
    })?;

    let backend = OllamaBackend::from_base_url(config.refiner.base_url.as_deref());
    debug!(base_url = %backend.config().base_url, "ollama backend ready");

    Ok(Refiner::new(
        Arc::new(config.refiner.clone()),
        Arc::new(templates),
        Arc::new(backend),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_refiner_fails_without_templates() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            templates_dir: dir.path().join("missing"),
            ..AppConfig::default()
        };
        let err = build_refiner(&config).unwrap_err();
        assert!(err.to_string().contains("failed to load templates"));
    }

    #[test]
    fn build_refiner_uses_configured_host() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system_uz.txt"), "uz").unwrap();
        std::fs::write(dir.path().join("system_ru.txt"), "ru").unwrap();
        std::fs::write(dir.path().join("modes.yaml"), "chatgpt:\n  sections: [Maqsad]\n").unwrap();

        let mut config = AppConfig {
            templates_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        config.refiner.base_url = Some("http://gpu-box:11434".into());

        let refiner = build_refiner(&config).unwrap();
        assert_eq!(refiner.adapter().backend().base_url(), "http://gpu-box:11434");
    }
}
