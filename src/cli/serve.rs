use std::path::Path;
use std::sync::Arc;

use crate::config::HubConfig;
use crate::emitter::Emitter;
use crate::error::Result;
use crate::server;

/// Execute the `serve` command: start the broadcast gateway.
pub async fn execute(host: Option<&str>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = HubConfig::load(config_path)?;

    // Override config with CLI arguments
    if let Some(host) = host {
        config.host = host.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }

    let emitter = Arc::new(Emitter::new(config.emitter_capacity));

    println!("loghub gateway starting...");
    println!("Streaming at ws://{}/logs/stream", config.bind_address());
    println!("Press Ctrl+C to stop");

    server::start(config, emitter).await
}
