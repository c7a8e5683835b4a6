//! WebSocket handler for live log streaming
//!
//! Each connection negotiates its filter once, via the upgrade request's
//! query parameters, then receives matching events as JSON text frames.
//! No client-to-server messages are required after setup; the inbound
//! half is watched only for close and transport errors.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use super::state::AppState;
use crate::event::Source;
use crate::filter::LogFilter;

/// Connection-time filter parameters.
///
/// Both optional; unrecognized values fall back to permissive rather
/// than refusing the connection.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    level: Option<String>,
    source: Option<String>,
}

/// `GET /logs/stream` — upgrade and stream admitted events.
pub async fn stream_logs(
    ws: WebSocketUpgrade,
    Query(params): Query<StreamParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let filter = LogFilter::from_params(params.level.as_deref(), params.source.as_deref());
    ws.on_upgrade(move |socket| handle_socket(socket, state, filter))
}

async fn handle_socket(socket: WebSocket, state: AppState, filter: LogFilter) {
    let (id, mut rx) = state.registry.register(filter).await;
    state
        .emitter
        .info(Source::Transport, format!("consumer connected ({})", id));

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::warn!(connection = %id, error = %e, "Failed to serialize event");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    // Registry entry removed out from under us
                    None => break,
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Nothing else is part of the contract; ignore.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    // Runs for graceful and abrupt disconnects alike.
    state.registry.deregister(&id).await;
    state
        .emitter
        .info(Source::Transport, format!("consumer disconnected ({})", id));
}
