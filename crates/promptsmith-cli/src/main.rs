//! `psmith` -- CLI binary for the promptsmith prompt refiner.
//!
//! Provides the following subcommands:
//!
//! - `psmith refine` -- Refine one prompt and print it (streamed by default).
//! - `psmith shell` -- Interactive chat with a prompt-engineering mode.
//! - `psmith serve` -- Run the HTTP API.
//! - `psmith config` -- Print the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;
mod interactive;

/// UZ/RU prompt engineer CLI.
#[derive(Parser)]
#[command(name = "psmith", about = "UZ/RU prompt engineer (profiles + cascade)", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Refine a single prompt.
    Refine(commands::refine::RefineArgs),

    /// Start the interactive chat shell.
    Shell(commands::shell::ShellArgs),

    /// Serve the HTTP API.
    Serve(commands::serve::ServeArgs),

    /// Show resolved configuration.
    Config(commands::config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries generated text only.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Refine(args) => commands::refine::run(args).await?,
        Commands::Shell(args) => commands::shell::run(args).await?,
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Config(args) => commands::config_cmd::run(args)?,
    }

    Ok(())
}
