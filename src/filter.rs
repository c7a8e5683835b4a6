//! Per-subscriber admission predicates
//!
//! A `LogFilter` is created when a client connects and dropped when it
//! disconnects; it is immutable for the connection's lifetime.

use crate::event::{Level, Source, StructuredLog};
use serde::{Deserialize, Serialize};

/// Admission predicate over severity threshold and source tag.
///
/// An absent field admits everything on that axis; both absent is the
/// identity filter. The level check is a `>=` threshold, so raising the
/// threshold can only shrink the admitted set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    /// Minimum severity (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,

    /// Exact source match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl LogFilter {
    /// Parse connection parameters into a filter.
    ///
    /// Unrecognized level or source names are treated as absent
    /// (permissive), never as an error — a client asking for a level we
    /// don't know gets everything rather than a refused connection.
    pub fn from_params(level: Option<&str>, source: Option<&str>) -> Self {
        Self {
            level: level.and_then(Level::parse),
            source: source.and_then(Source::parse),
        }
    }

    /// Pure, total admission check.
    pub fn admits(&self, event: &StructuredLog) -> bool {
        let level_ok = match self.level {
            Some(threshold) => event.level.rank() >= threshold.rank(),
            None => true,
        };
        let source_ok = match self.source {
            Some(source) => event.source == source,
            None => true,
        };
        level_ok && source_ok
    }

    /// True when both fields are unset.
    pub fn is_identity(&self) -> bool {
        self.level.is_none() && self.source.is_none()
    }
}
