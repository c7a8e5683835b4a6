//! In-process log event hub
//!
//! `Emitter` decouples log producers from log consumers over a
//! `tokio::broadcast` channel. It is an explicitly constructed component:
//! built once at process start and handed to every producer and to the
//! gateway by reference, never an ambient singleton.
//!
//! Delivery is best-effort, at-most-once. With zero subscribers an
//! emitted event is simply dropped — no queue, no retry, no persistence.
//! A subscriber that falls behind sees `RecvError::Lagged` and skips to
//! the newest events; it can never block the producer or starve another
//! subscriber.

use crate::event::{Level, LogMeta, Source, StructuredLog};
use tokio::sync::broadcast;

/// Process-wide publish/subscribe hub for [`StructuredLog`] events.
pub struct Emitter {
    tx: broadcast::Sender<StructuredLog>,
}

impl Emitter {
    /// Create an emitter whose broadcast buffer holds `capacity` events
    /// per subscriber before the oldest are overwritten.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Construct an event stamped with the current instant and publish
    /// it to all current subscribers.
    ///
    /// The returned event is the exact record subscribers see. A send
    /// with no receivers is not an error; the event is dropped.
    pub fn emit(
        &self,
        level: Level,
        source: Source,
        message: impl Into<String>,
        meta: Option<LogMeta>,
    ) -> StructuredLog {
        let event = StructuredLog::now(level, source, message, meta);
        let _ = self.tx.send(event.clone());
        event
    }

    /// Subscribe to the event stream.
    ///
    /// The receiver is the subscription handle; dropping it is
    /// unsubscription. Each receiver gets its own view of the stream in
    /// emission order.
    pub fn subscribe(&self) -> broadcast::Receiver<StructuredLog> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Emit at `debug` level.
    pub fn debug(&self, source: Source, message: impl Into<String>) -> StructuredLog {
        self.emit(Level::Debug, source, message, None)
    }

    /// Emit at `info` level.
    pub fn info(&self, source: Source, message: impl Into<String>) -> StructuredLog {
        self.emit(Level::Info, source, message, None)
    }

    /// Emit at `warn` level.
    pub fn warn(&self, source: Source, message: impl Into<String>) -> StructuredLog {
        self.emit(Level::Warn, source, message, None)
    }

    /// Emit at `error` level.
    pub fn error(&self, source: Source, message: impl Into<String>) -> StructuredLog {
        self.emit(Level::Error, source, message, None)
    }

    /// Emit at `info` level with meta attached.
    pub fn info_with(
        &self,
        source: Source,
        message: impl Into<String>,
        meta: LogMeta,
    ) -> StructuredLog {
        self.emit(Level::Info, source, message, Some(meta))
    }

    /// Emit at `warn` level with meta attached.
    pub fn warn_with(
        &self,
        source: Source,
        message: impl Into<String>,
        meta: LogMeta,
    ) -> StructuredLog {
        self.emit(Level::Warn, source, message, Some(meta))
    }

    /// Emit at `error` level with meta attached.
    pub fn error_with(
        &self,
        source: Source,
        message: impl Into<String>,
        meta: LogMeta,
    ) -> StructuredLog {
        self.emit(Level::Error, source, message, Some(meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_with_no_subscribers_is_dropped() {
        let emitter = Emitter::new(16);
        assert_eq!(emitter.subscriber_count(), 0);

        // No panic, no error; the event is still returned to the caller.
        let event = emitter.info(Source::Db, "connected");
        assert_eq!(event.level, Level::Info);
        assert_eq!(event.source, Source::Db);
    }

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        emitter.warn(Source::Api, "GET /missing 404");

        let received = rx.recv().await.unwrap();
        assert_eq!(received.level, Level::Warn);
        assert_eq!(received.source, Source::Api);
        assert_eq!(received.message, "GET /missing 404");
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_get_every_event() {
        let emitter = Emitter::new(16);
        let mut rx1 = emitter.subscribe();
        let mut rx2 = emitter.subscribe();
        assert_eq!(emitter.subscriber_count(), 2);

        emitter.error(Source::Auth, "login rejected");

        assert_eq!(rx1.recv().await.unwrap().message, "login rejected");
        assert_eq!(rx2.recv().await.unwrap().message, "login rejected");
    }

    #[tokio::test]
    async fn test_dropped_receiver_stops_counting() {
        let emitter = Emitter::new(16);
        let rx = emitter.subscribe();
        assert_eq!(emitter.subscriber_count(), 1);

        drop(rx);
        assert_eq!(emitter.subscriber_count(), 0);

        // Emitting after the drop is still fine.
        emitter.info(Source::Lifecycle, "still running");
    }

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let emitter = Emitter::new(64);
        let mut rx = emitter.subscribe();

        for i in 0..10 {
            emitter.info(Source::Order, format!("event {}", i));
        }

        for i in 0..10 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.message, format!("event {}", i));
        }
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_without_blocking_emit() {
        let emitter = Emitter::new(4);
        let mut rx = emitter.subscribe();

        // Overrun the buffer; emit never blocks.
        for i in 0..20 {
            emitter.info(Source::Db, format!("event {}", i));
        }

        // The stale receiver observes the gap, then the newest events.
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(n)) => assert!(n > 0),
            other => panic!("expected Lagged, got {:?}", other),
        }
        let event = rx.recv().await.unwrap();
        assert!(event.message.starts_with("event"));
    }

    #[tokio::test]
    async fn test_meta_rides_along() {
        let emitter = Emitter::new(16);
        let mut rx = emitter.subscribe();

        let meta = LogMeta {
            actor: Some("user-7".to_string()),
            ..LogMeta::default()
        };
        emitter.warn_with(Source::Auth, "password retry", meta);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.meta.unwrap().actor.as_deref(), Some("user-7"));
    }
}
