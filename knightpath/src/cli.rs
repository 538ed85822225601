//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shortest knight paths on an 8×8 board
#[derive(Parser, Debug)]
#[command(name = "knightpath")]
#[command(about = "Minimum knight moves between two squares", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve one query, e.g. `knightpath path a1 h8`
    Path {
        /// Starting square (a1..h8)
        source: String,
        /// Destination square (a1..h8)
        target: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the move count from a square to every square of the board
    Map {
        /// Starting square (a1..h8)
        source: String,
    },

    /// Read JSON-lines requests on stdin, run them through the job queue
    /// and print one JSON response per line
    Batch {
        /// TOML service configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of worker threads (overrides the config file)
        #[arg(short, long)]
        workers: Option<usize>,
    },
}
