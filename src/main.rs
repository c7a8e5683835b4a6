use clap::Parser;
use tracing_subscriber::EnvFilter;

use loghub::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so `tail` output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            loghub::cli::serve::execute(host.as_deref(), port, config.as_deref()).await?;
        }
        Commands::Tail { level, source, url } => {
            loghub::cli::tail::execute(level.as_deref(), source.as_deref(), &url).await?;
        }
    }

    Ok(())
}
