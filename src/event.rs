//! Core log event types
//!
//! All types use camelCase JSON serialization for wire compatibility.
//! A `StructuredLog` is an immutable fact: created once by the emitter,
//! pushed to whoever is listening, then discarded. Nothing in this crate
//! stores, updates, or retries one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Severity of a log event. The ordering is total and fixed:
/// `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Numeric rank used for threshold comparison.
    pub fn rank(self) -> u8 {
        match self {
            Level::Debug => 0,
            Level::Info => 1,
            Level::Warn => 2,
            Level::Error => 3,
        }
    }

    /// Parse a level name. Unknown names yield `None` — callers treat
    /// that as "no threshold" rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }

    /// All levels, lowest first.
    pub fn all() -> [Level; 4] {
        [Level::Debug, Level::Info, Level::Warn, Level::Error]
    }

    /// Display label (lowercase, matches the wire name).
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed tag identifying the subsystem that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Request handling
    Api,
    /// Persistence layer
    Db,
    /// Authentication flows
    Auth,
    /// Domain logic (orders, menus, users)
    Order,
    /// Connection-level transport events
    Transport,
    /// Process start/stop and other lifecycle notices
    Lifecycle,
}

impl Source {
    /// Parse a source tag. Unknown names yield `None` — callers treat
    /// that as "admit all sources" rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Some(Source::Api),
            "db" => Some(Source::Db),
            "auth" => Some(Source::Auth),
            "order" => Some(Source::Order),
            "transport" => Some(Source::Transport),
            "lifecycle" => Some(Source::Lifecycle),
            _ => None,
        }
    }

    /// All source tags.
    pub fn all() -> [Source; 6] {
        [
            Source::Api,
            Source::Db,
            Source::Auth,
            Source::Order,
            Source::Transport,
            Source::Lifecycle,
        ]
    }

    /// Display label (lowercase, matches the wire name).
    pub fn label(self) -> &'static str {
        match self {
            Source::Api => "api",
            Source::Db => "db",
            Source::Auth => "auth",
            Source::Order => "order",
            Source::Transport => "transport",
            Source::Lifecycle => "lifecycle",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Optional structured attachment on a log event.
///
/// Every field is best-effort; filtering never depends on meta. Keys not
/// covered by the named fields ride along in the flattened map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMeta {
    /// HTTP method (e.g. "GET")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request path (e.g. "/orders/42")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Final response status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Elapsed milliseconds from handler start to response finalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Acting user or system identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Anything else a producer wants to attach
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl LogMeta {
    /// Add an ad-hoc entry to the open map.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A single log event.
///
/// The timestamp is stamped by the [`Emitter`](crate::Emitter) at emission
/// time, not by the producer, so the stream is monotonic-enough at the
/// point of fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredLog {
    /// Event creation instant (UTC)
    pub timestamp: DateTime<Utc>,

    /// Severity
    pub level: Level,

    /// Producing subsystem
    pub source: Source,

    /// Human-readable summary
    pub message: String,

    /// Optional structured attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LogMeta>,
}

impl StructuredLog {
    /// Create an event stamped with the current instant.
    pub fn now(
        level: Level,
        source: Source,
        message: impl Into<String>,
        meta: Option<LogMeta>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            source,
            message: message.into(),
            meta,
        }
    }
}
