pub mod serve;
pub mod tail;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// loghub - structured log broadcasting
#[derive(Debug, Parser)]
#[command(name = "loghub", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the broadcast gateway
    Serve {
        /// Host address to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Stream logs from a running gateway to the terminal
    Tail {
        /// Minimum severity to receive (debug, info, warn, error)
        #[arg(long)]
        level: Option<String>,

        /// Only receive events from this source tag
        #[arg(long)]
        source: Option<String>,

        /// Gateway endpoint
        #[arg(long, default_value = "ws://127.0.0.1:9870/logs/stream")]
        url: String,
    },
}
