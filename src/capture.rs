//! Request capture — the producer seam
//!
//! Derives exactly one log event per completed or failed request and
//! hands it to the [`Emitter`]. This adapter is deliberately thin: it
//! knows the shape of a request lifecycle and nothing else.
//!
//! Two entry points:
//! - [`InFlightRequest`], a framework-neutral guard for any request
//!   handling layer: `begin` before the handler, then `complete(status)`
//!   or `fail(error, status)`.
//! - [`track`], an axum middleware over the same guard, mounted on the
//!   gateway's own router.

use crate::emitter::Emitter;
use crate::event::{Level, LogMeta, Source, StructuredLog};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status synthesized for failures that carry none.
const DEFAULT_FAILURE_STATUS: u16 = 500;

/// A request being timed; consumed by `complete` or `fail`.
pub struct InFlightRequest<'a> {
    emitter: &'a Emitter,
    method: String,
    path: String,
    started: Instant,
}

impl<'a> InFlightRequest<'a> {
    /// Capture the start instant before the handler runs.
    pub fn begin(emitter: &'a Emitter, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            emitter,
            method: method.into(),
            path: path.into(),
            started: Instant::now(),
        }
    }

    /// The request finished with a response. Emits one `info` event, or
    /// `warn` when the status is >= 400.
    pub fn complete(self, status: u16) -> StructuredLog {
        let elapsed = self.started.elapsed();
        self.finish(status, elapsed)
    }

    /// The request died with an unhandled failure. Emits one `error`
    /// event carrying the failure message; the status defaults to 500
    /// when the failure carries none.
    pub fn fail(self, error: impl std::fmt::Display, status: Option<u16>) -> StructuredLog {
        let elapsed = self.started.elapsed();
        let status = status.unwrap_or(DEFAULT_FAILURE_STATUS);
        let message = format!("{} {} failed: {}", self.method, self.path, error);
        let meta = self.meta(status, elapsed);
        self.emitter.emit(Level::Error, Source::Api, message, Some(meta))
    }

    fn finish(self, status: u16, elapsed: Duration) -> StructuredLog {
        let level = if status >= 400 { Level::Warn } else { Level::Info };
        let message = format!("{} {} {}", self.method, self.path, status);
        let meta = self.meta(status, elapsed);
        self.emitter.emit(level, Source::Api, message, Some(meta))
    }

    /// Method and path are always known; status and duration are filled
    /// with whatever this adapter has at the time.
    fn meta(&self, status: u16, elapsed: Duration) -> LogMeta {
        LogMeta {
            method: Some(self.method.clone()),
            path: Some(self.path.clone()),
            status_code: Some(status),
            duration_ms: Some(elapsed.as_millis() as u64),
            ..LogMeta::default()
        }
    }
}

/// axum middleware: one event per completed request.
pub async fn track(
    State(emitter): State<Arc<Emitter>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let in_flight = InFlightRequest::begin(&emitter, method, path);
    let response = next.run(request).await;
    in_flight.complete(response.status().as_u16());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_request_emits_info() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        InFlightRequest::begin(&emitter, "GET", "/orders").complete(200);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.level, Level::Info);
        assert_eq!(event.source, Source::Api);
        assert_eq!(event.message, "GET /orders 200");

        let meta = event.meta.unwrap();
        assert_eq!(meta.method.as_deref(), Some("GET"));
        assert_eq!(meta.path.as_deref(), Some("/orders"));
        assert_eq!(meta.status_code, Some(200));
        assert!(meta.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_status_404_with_12ms_emits_one_warn() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        InFlightRequest {
            emitter: &emitter,
            method: "GET".to_string(),
            path: "/missing".to_string(),
            started: Instant::now(),
        }
        .finish(404, Duration::from_millis(12));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.level, Level::Warn);
        let meta = event.meta.unwrap();
        assert_eq!(meta.status_code, Some(404));
        assert_eq!(meta.duration_ms, Some(12));

        // Exactly one event
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_emits_error_with_synthesized_500() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        InFlightRequest::begin(&emitter, "POST", "/orders").fail("db timeout", None);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.level, Level::Error);
        assert_eq!(event.message, "POST /orders failed: db timeout");
        assert_eq!(event.meta.unwrap().status_code, Some(500));
    }

    #[tokio::test]
    async fn test_failure_keeps_carried_status() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        InFlightRequest::begin(&emitter, "PUT", "/menu/3").fail("stale version", Some(409));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.meta.unwrap().status_code, Some(409));
    }

    #[tokio::test]
    async fn test_emitting_without_subscribers_never_disturbs_the_request() {
        let emitter = Emitter::new(16);
        // No subscribers at all: completion must still be a clean no-op.
        let event = InFlightRequest::begin(&emitter, "GET", "/healthz").complete(200);
        assert_eq!(event.level, Level::Info);
    }
}
