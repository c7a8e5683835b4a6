//! # loghub
//!
//! Structured log broadcasting: an in-process emitter, a WebSocket
//! fan-out gateway with per-connection filters, and a terminal tail
//! client.
//!
//! ## Overview
//!
//! Events flow one way: producers call the [`Emitter`], a dispatcher
//! bridges the emitter into the gateway's [`SubscriberRegistry`], and
//! each connected consumer receives exactly the subset its
//! [`LogFilter`] admits. Delivery is best-effort, at-most-once: no
//! persistence, no replay, no retry.
//!
//! ## Quick Start
//!
//! ```rust
//! use loghub::{Emitter, Level, Source};
//!
//! # tokio_test::block_on(async {
//! // Built once at process start, handed around by reference
//! let emitter = Emitter::new(64);
//!
//! let mut rx = emitter.subscribe();
//! emitter.warn(Source::Api, "GET /missing 404");
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.level, Level::Warn);
//! assert_eq!(event.message, "GET /missing 404");
//! # });
//! ```
//!
//! ## Architecture
//!
//! - **Emitter** — process-wide publish/subscribe hub over a broadcast
//!   channel; zero subscribers means the event is dropped
//! - **Request capture** — one event per completed or failed request,
//!   via [`capture::InFlightRequest`] or the bundled axum middleware
//! - **Gateway** — `GET /logs/stream` upgrades to a WebSocket; the
//!   filter is negotiated once from query parameters and lives exactly
//!   as long as the connection
//! - **Tail** — renders the stream, reconnects with backoff, exits
//!   cleanly on a shutdown signal

pub mod capture;
pub mod cli;
pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod filter;
pub mod server;

// Re-export core types
pub use config::HubConfig;
pub use emitter::Emitter;
pub use error::{LogHubError, Result};
pub use event::{Level, LogMeta, Source, StructuredLog};
pub use filter::LogFilter;
pub use server::registry::SubscriberRegistry;
pub use server::state::AppState;
