//! `psmith serve` -- run the HTTP API.
//!
//! # Examples
//!
//! ```text
//! psmith serve
//! psmith serve --host 0.0.0.0 --port 9000
//! ```

use std::sync::Arc;

use clap::Args;
use promptsmith_services::{ApiState, serve};
use promptsmith_types::ServerConfig;
use tracing::info;

use super::{build_refiner, load_config};

/// Arguments for the `psmith serve` subcommand.
#[derive(Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config).
    #[arg(long)]
    pub port: Option<u16>,

    /// Config file path (overrides discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

impl ServeArgs {
    fn apply(&self, mut server: ServerConfig) -> ServerConfig {
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }
        server
    }
}

/// Run the serve command until Ctrl-C.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref());
    let refiner = build_refiner(&config)?;
    let server = args.apply(config.server.clone());

    info!(
        model = %config.refiner.model,
        host = %server.host,
        port = server.port,
        "starting refine api"
    );
    serve(&server, ApiState::new(Arc::new(refiner))).await?;
    Ok(())
}
