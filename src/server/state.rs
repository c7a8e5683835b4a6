use std::sync::Arc;

use crate::config::HubConfig;
use crate::emitter::Emitter;
use crate::server::registry::SubscriberRegistry;

/// Shared application state accessible to all gateway handlers.
#[derive(Clone)]
pub struct AppState {
    pub emitter: Arc<Emitter>,
    pub registry: Arc<SubscriberRegistry>,
    pub config: Arc<HubConfig>,
}

impl AppState {
    pub fn new(
        emitter: Arc<Emitter>,
        registry: Arc<SubscriberRegistry>,
        config: Arc<HubConfig>,
    ) -> Self {
        Self {
            emitter,
            registry,
            config,
        }
    }
}
