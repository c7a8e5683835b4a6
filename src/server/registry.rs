//! Connection registry and fan-out
//!
//! One entry per live gateway connection: the filter negotiated at
//! connect time and a bounded queue feeding that connection's socket
//! task. The table is the only shared mutable state in the gateway;
//! payload delivery happens over the per-connection queues, so holding
//! the table lock never waits on a slow consumer.

use crate::event::StructuredLog;
use crate::filter::LogFilter;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

struct Subscriber {
    filter: LogFilter,
    tx: mpsc::Sender<StructuredLog>,
}

/// Shared table of live connections, keyed by connection id.
pub struct SubscriberRegistry {
    inner: RwLock<HashMap<String, Subscriber>>,
    /// Per-connection queue capacity
    buffer: usize,
}

impl SubscriberRegistry {
    /// Create a registry whose per-connection queues hold `buffer`
    /// events before further events are dropped for that connection.
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            buffer,
        }
    }

    /// Register a new connection with its negotiated filter.
    ///
    /// Returns the connection id and the receiving end of the
    /// connection's queue.
    pub async fn register(&self, filter: LogFilter) -> (String, mpsc::Receiver<StructuredLog>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.buffer);

        let mut inner = self.inner.write().await;
        inner.insert(id.clone(), Subscriber { filter, tx });

        tracing::info!(connection = %id, ?filter, total = inner.len(), "Subscriber registered");
        (id, rx)
    }

    /// Remove a connection. Idempotent; called on every disconnect path,
    /// graceful or abrupt, so the table cannot leak across churn.
    pub async fn deregister(&self, id: &str) -> bool {
        let removed = self.inner.write().await.remove(id).is_some();
        if removed {
            tracing::info!(connection = %id, "Subscriber deregistered");
        }
        removed
    }

    /// Deliver one event to every connection whose filter admits it.
    ///
    /// Returns the number of queues the event was placed on. Never
    /// blocks: a full queue drops the event for that connection only; a
    /// closed queue marks the connection stale and it is pruned before
    /// returning.
    pub async fn broadcast(&self, event: &StructuredLog) -> usize {
        let mut delivered = 0;
        let mut stale: Vec<String> = Vec::new();

        {
            let inner = self.inner.read().await;
            for (id, sub) in inner.iter() {
                if !sub.filter.admits(event) {
                    continue;
                }
                match sub.tx.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!(connection = %id, "Subscriber queue full, event dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        stale.push(id.clone());
                    }
                }
            }
        }

        if !stale.is_empty() {
            let mut inner = self.inner.write().await;
            for id in &stale {
                inner.remove(id);
            }
            tracing::debug!(pruned = stale.len(), "Removed stale subscribers");
        }

        delivered
    }

    /// Number of registered connections.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}
