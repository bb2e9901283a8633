use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::config::{Config, RuntimeConfig};
use super::registry::{ErrorHandler, Moviper, Shared, log_error};
use super::router::Router;
use crate::{
    error::RegistryError,
    events::Bus,
    subscribers::{Fanout, Subscribe},
};

/// Builder for constructing a [`Moviper`] registry.
pub struct MoviperBuilder {
    cfg: RuntimeConfig,
    config: Config,
    handler: ErrorHandler,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl MoviperBuilder {
    /// Creates a new builder with the given pipeline configuration.
    pub fn new(cfg: RuntimeConfig) -> Self {
        Self {
            cfg,
            config: Config::default(),
            handler: Arc::new(log_error),
            subscribers: Vec::new(),
        }
    }

    /// Initial access gates (default: both disabled).
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Initial error handler (default: log and continue).
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RegistryError) + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive registry events through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry and spawns its background tasks.
    ///
    /// This consumes the builder and initializes:
    /// - Event bus for broadcasting
    /// - Router (single consumer of the registration channel)
    /// - Subscriber fan-out (only if subscribers were given)
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Arc<Moviper> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let shared = Arc::new(Shared::new(self.config, self.handler, bus.clone()));
        let token = CancellationToken::new();

        // Must subscribe to the bus before the router can publish.
        let fanout = if self.subscribers.is_empty() {
            None
        } else {
            Some(Fanout::spawn(self.subscribers, &bus, token.clone()))
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let router = Router::new(Arc::clone(&shared), rx, self.cfg.restart);
        let router = tokio::spawn(router.run(token.clone()));

        Arc::new(Moviper::from_parts(shared, tx, token, router, fanout))
    }
}
