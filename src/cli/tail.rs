//! `tail` — the terminal log consumer
//!
//! Connects to a gateway, negotiates its filter through the connection
//! URL, and renders each received event as one colorized line:
//! `HH:MM:SS [source][level] message`. Drops reconnect automatically
//! with exponential backoff; a shutdown signal closes the socket and
//! exits 0 from any state. Events missed while disconnected are gone —
//! there is no replay.
//!
//! `meta.durationMs` is carried on the wire but not rendered inline;
//! it stays available to any consumer that wants it.

use std::time::{Duration, Instant};

use colored::Colorize;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;

use crate::error::{LogHubError, Result};
use crate::event::{Level, StructuredLog};
use crate::filter::LogFilter;

/// Minimum backoff between reconnect attempts.
const MIN_BACKOFF: Duration = Duration::from_secs(1);
/// Maximum backoff cap.
const MAX_BACKOFF: Duration = Duration::from_secs(30);
/// If a connection lives longer than this, the backoff resets.
const HEALTHY_THRESHOLD: Duration = Duration::from_secs(60);

/// Execute the `tail` command.
///
/// Returns an error only for an unrecoverable startup failure (malformed
/// endpoint); every later failure is handled by the reconnect loop, and
/// a shutdown signal ends the command cleanly.
pub async fn execute(level: Option<&str>, source: Option<&str>, url: &str) -> Result<()> {
    let filter = requested_filter(level, source);
    let endpoint = build_endpoint(url, &filter)?;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut backoff = MIN_BACKOFF;
    loop {
        let connected = tokio::select! {
            _ = &mut shutdown => {
                notice("terminated");
                return Ok(());
            }
            result = connect_async(endpoint.as_str()) => result,
        };

        match connected {
            Ok((mut socket, _response)) => {
                notice("connected");
                let started = Instant::now();

                let terminated = loop {
                    tokio::select! {
                        _ = &mut shutdown => {
                            // Teardown runs on this path too; close,
                            // then fall through to a clean exit.
                            let _ = socket.close(None).await;
                            break true;
                        }
                        frame = socket.next() => match frame {
                            Some(Ok(Message::Text(text))) => {
                                match serde_json::from_str::<StructuredLog>(&text) {
                                    Ok(event) => println!("{}", render(&event)),
                                    Err(e) => {
                                        tracing::debug!(error = %e, "Skipping unparseable frame");
                                    }
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => break false,
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                tracing::debug!(error = %e, "Stream error");
                                break false;
                            }
                        }
                    }
                };

                if terminated {
                    notice("terminated");
                    return Ok(());
                }

                if started.elapsed() >= HEALTHY_THRESHOLD {
                    backoff = MIN_BACKOFF;
                }
                notice("disconnected, reconnecting...");
            }
            Err(e) => {
                notice(&format!("connection failed ({e}), retrying..."));
            }
        }

        tokio::select! {
            _ = &mut shutdown => {
                notice("terminated");
                return Ok(());
            }
            _ = tokio::time::sleep(backoff) => {}
        }
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

/// Parse the requested filter the same permissive way the gateway does,
/// but tell the user when a value was not understood.
fn requested_filter(level: Option<&str>, source: Option<&str>) -> LogFilter {
    let filter = LogFilter::from_params(level, source);
    if level.is_some() && filter.level.is_none() {
        notice("unknown level, streaming all levels");
    }
    if source.is_some() && filter.source.is_none() {
        notice("unknown source, streaming all sources");
    }
    filter
}

/// Validate the endpoint and attach the filter as query parameters.
///
/// A malformed endpoint fails here, before the first connection
/// attempt; the reconnect loop only ever sees transport failures.
fn build_endpoint(url: &str, filter: &LogFilter) -> Result<String> {
    if !url.starts_with("ws://") && !url.starts_with("wss://") {
        return Err(LogHubError::InvalidEndpoint {
            url: url.to_string(),
            reason: "expected a ws:// or wss:// URL".to_string(),
        });
    }

    let mut endpoint = url.to_string();
    let mut separator = if url.contains('?') { '&' } else { '?' };
    if let Some(level) = filter.level {
        endpoint.push(separator);
        endpoint.push_str(&format!("level={}", level.label()));
        separator = '&';
    }
    if let Some(source) = filter.source {
        endpoint.push(separator);
        endpoint.push_str(&format!("source={}", source.label()));
    }

    // Full parse, the same one connect_async would do.
    endpoint
        .as_str()
        .into_client_request()
        .map_err(|e| LogHubError::InvalidEndpoint {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    Ok(endpoint)
}

/// One rendered line: `HH:MM:SS [source][level] message`.
fn render(event: &StructuredLog) -> String {
    let ts = event
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    format!(
        "{} {}{} {}",
        ts.to_string().dimmed(),
        source_tag(event),
        level_tag(event.level),
        event.message
    )
}

fn level_tag(level: Level) -> String {
    let tag = format!("[{}]", level.label());
    match level {
        Level::Debug => tag.blue(),
        Level::Info => tag.green(),
        Level::Warn => tag.yellow(),
        Level::Error => tag.red(),
    }
    .to_string()
}

fn source_tag(event: &StructuredLog) -> String {
    use crate::event::Source;
    let tag = format!("[{}]", event.source.label());
    match event.source {
        Source::Api => tag.cyan(),
        Source::Db => tag.magenta(),
        Source::Auth => tag.yellow(),
        Source::Order => tag.green(),
        Source::Transport => tag.blue(),
        Source::Lifecycle => tag.white(),
    }
    .to_string()
}

/// Status notices go to stderr so the event stream on stdout stays clean.
fn notice(message: &str) {
    eprintln!("{}", format!("-- {message}").dimmed());
}

/// Resolves on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Source;

    #[test]
    fn test_build_endpoint_without_filter() {
        let endpoint = build_endpoint("ws://localhost:9870/logs/stream", &LogFilter::default());
        assert_eq!(endpoint.unwrap(), "ws://localhost:9870/logs/stream");
    }

    #[test]
    fn test_build_endpoint_with_filter() {
        let filter = LogFilter::from_params(Some("warn"), Some("api"));
        let endpoint = build_endpoint("ws://localhost:9870/logs/stream", &filter).unwrap();
        assert_eq!(endpoint, "ws://localhost:9870/logs/stream?level=warn&source=api");
    }

    #[test]
    fn test_build_endpoint_appends_to_existing_query() {
        let filter = LogFilter::from_params(Some("error"), None);
        let endpoint = build_endpoint("wss://host/logs/stream?token=x", &filter).unwrap();
        assert_eq!(endpoint, "wss://host/logs/stream?token=x&level=error");
    }

    #[test]
    fn test_build_endpoint_rejects_non_ws_scheme() {
        let result = build_endpoint("http://localhost:9870", &LogFilter::default());
        assert!(matches!(result, Err(LogHubError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_build_endpoint_rejects_unparseable_ws_url() {
        // ws-prefixed but not a URL: must fail up front, not loop in
        // the reconnect path.
        for url in ["ws://:bad", "ws://", "wss://host with spaces"] {
            let result = build_endpoint(url, &LogFilter::default());
            assert!(
                matches!(result, Err(LogHubError::InvalidEndpoint { .. })),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_render_line_shape() {
        colored::control::set_override(false);
        let event = StructuredLog::now(Level::Warn, Source::Api, "GET /missing 404", None);
        let line = render(&event);
        colored::control::unset_override();

        // HH:MM:SS [source][level] message
        assert!(line.ends_with("[api][warn] GET /missing 404"));
        let ts = line.split(' ').next().unwrap();
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.matches(':').count(), 2);
    }

    #[test]
    fn test_requested_filter_falls_back_permissively() {
        let filter = requested_filter(Some("shout"), Some("kitchen"));
        assert!(filter.is_identity());
    }
}
