use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogHubError, Result};

/// User-configurable settings for the gateway and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Host address for the gateway (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the gateway (default: 9870)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Emitter broadcast buffer, events per subscriber (default: 256)
    #[serde(default = "default_emitter_capacity")]
    pub emitter_capacity: usize,

    /// Per-connection delivery queue capacity (default: 64)
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9870
}

fn default_emitter_capacity() -> usize {
    256
}

fn default_connection_buffer() -> usize {
    64
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            emitter_capacity: default_emitter_capacity(),
            connection_buffer: default_connection_buffer(),
        }
    }
}

impl HubConfig {
    /// Load configuration from a TOML file.
    ///
    /// With no path, returns the defaults. An explicit path that cannot
    /// be read or parsed is an error, as is a file carrying values the
    /// pipeline cannot run with.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    LogHubError::Config(format!(
                        "Failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                toml::from_str(&content).map_err(|e| {
                    LogHubError::Config(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Both channel capacities must be nonzero; the underlying broadcast
    /// and mpsc channels panic on a zero capacity, and this crate never
    /// panics on bad input.
    fn validate(&self) -> Result<()> {
        if self.emitter_capacity == 0 {
            return Err(LogHubError::Config(
                "emitter_capacity must be at least 1".to_string(),
            ));
        }
        if self.connection_buffer == 0 {
            return Err(LogHubError::Config(
                "connection_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the gateway bind address string (e.g., "127.0.0.1:9870").
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
