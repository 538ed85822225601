//! knightpath — minimum knight moves between two squares.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Path {
            source,
            target,
            json,
        } => commands::path(&source, &target, json, &mut out),
        Command::Map { source } => commands::map(&source, &mut out),
        Command::Batch { config, workers } => {
            commands::batch(config.as_deref(), workers, std::io::stdin().lock(), &mut out)
        }
    }
}
