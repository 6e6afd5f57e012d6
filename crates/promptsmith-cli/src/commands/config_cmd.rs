//! `psmith config` -- display resolved configuration.
//!
//! Shows the configuration after file defaults, sanitizing and the
//! `OLLAMA_HOST` override have been applied, as YAML.
//!
//! # Examples
//!
//! ```text
//! psmith config
//! psmith config refiner
//! psmith config server --config alt.yaml
//! ```

use clap::Args;
use promptsmith_types::AppConfig;

use super::load_config;

/// Arguments for the `psmith config` subcommand.
#[derive(Args)]
pub struct ConfigArgs {
    /// Show only this section (refiner, templates_dir, server, shell).
    pub section: Option<String>,

    /// Config file path (overrides discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Run the config command.
pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref());
    let rendered = match args.section.as_deref() {
        None => render(&config)?,
        Some(name) => render_section(&config, name)?,
    };
    print!("{rendered}");
    Ok(())
}

/// The full configuration as YAML.
fn render(config: &AppConfig) -> anyhow::Result<String> {
    Ok(serde_yaml::to_string(config)?)
}

/// One top-level section as YAML.
fn render_section(config: &AppConfig, section: &str) -> anyhow::Result<String> {
    let value = serde_yaml::to_value(config)?;
    match value.get(section) {
        Some(v) => Ok(serde_yaml::to_string(v)?),
        None => {
            let available: Vec<&str> = value
                .as_mapping()
                .map(|m| m.keys().filter_map(|k| k.as_str()).collect())
                .unwrap_or_default();
            anyhow::bail!(
                "unknown section '{section}' (available: {})",
                available.join(", ")
            )
        }
    }
}
