//! Broadcast gateway
//!
//! Accepts any number of long-lived WebSocket connections and delivers,
//! to each, exactly the subset of emitted events its filter admits. One
//! dispatcher task bridges the emitter's broadcast stream into the
//! per-connection queues; connection churn never blocks delivery to
//! unrelated connections, and a slow consumer never blocks emission.

pub mod registry;
pub mod router;
pub mod state;
pub mod ws;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::HubConfig;
use crate::emitter::Emitter;
use crate::error::{LogHubError, Result};
use crate::event::Source;
use registry::SubscriberRegistry;
use state::AppState;

/// Start the gateway on the configured address.
pub async fn start(config: HubConfig, emitter: Arc<Emitter>) -> Result<()> {
    let bind_addr = config.bind_address();
    let registry = Arc::new(SubscriberRegistry::new(config.connection_buffer));
    let app_state = AppState::new(emitter, registry, Arc::new(config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| LogHubError::Server(format!("Failed to bind to {bind_addr}: {e}")))?;

    tracing::info!("Gateway listening on {bind_addr}");
    serve_on(listener, app_state).await
}

/// Serve on an already-bound listener. Split out so tests can bind
/// port 0 and recover the address.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    spawn_dispatcher(&state.emitter, state.registry.clone());
    state.emitter.info(Source::Lifecycle, "gateway started");

    let app = router::build(state);
    axum::serve(listener, app)
        .await
        .map_err(|e| LogHubError::Server(format!("Server error: {e}")))?;

    Ok(())
}

/// Spawn the task that forwards every emitted event into the registry's
/// fan-out. Lagging skips to the newest events; a closed emitter ends
/// the task.
fn spawn_dispatcher(emitter: &Emitter, registry: Arc<SubscriberRegistry>) {
    let mut rx = emitter.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    registry.broadcast(&event).await;
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Dispatcher lagged, skipped events");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("Dispatcher stopped");
    });
}
