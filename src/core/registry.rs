//! # Moviper: the presenter registry.
//!
//! Central authority for presenter visibility across otherwise-decoupled
//! components. Presenters register on attach and unregister on detach; any
//! presenter may then locate its peers by type, or by type and name.
//!
//! ## Architecture
//! ```text
//! register(p) / unregister(p)
//!     │  (gate: presenter_access, else no-op)
//!     ▼
//! mpsc::unbounded (ordered) ──► Router (single consumer) ──► Store (copy-on-write)
//!                                  │                              ▲
//!                                  ├─► error handler              │ snapshot()
//!                                  └─► Bus ──► Fanout             │
//!                                                                 │
//! presenters::<P>() / presenter_instance::<P>(name) ──────────────┘
//!     (gates checked synchronously, scan is lazy)
//! ```
//!
//! ## Rules
//! - `register`/`unregister` return before the mutation lands; use [`Moviper::flush`]
//!   to wait for visibility
//! - Queries are eventually consistent with concurrent registrations
//! - Pipeline errors go to the error handler, never to the `register` caller
//! - Configuration gates fail fast at the call site

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::builder::MoviperBuilder;
use super::config::{Config, RuntimeConfig};
use super::query::PresenterStream;
use super::registration::Registration;
use super::router::RegistryEvent;
use super::store::{Insert, Store};
use crate::{
    error::{QueryError, RegistryError, describe_panic},
    events::{Bus, Event, EventKind},
    presenters::{Presenter, PresenterHandle},
    subscribers::Fanout,
};

/// Process-wide handler for pipeline errors.
pub type ErrorHandler = Arc<dyn Fn(&RegistryError) + Send + Sync>;

/// Default handler: log and continue.
pub(crate) fn log_error(err: &RegistryError) {
    tracing::error!(label = err.as_label(), error = %err, "registry default error handler");
}

/// State shared by the handle and the router.
pub(crate) struct Shared {
    config: RwLock<Config>,
    handler: RwLock<ErrorHandler>,
    pub(crate) store: Store,
    pub(crate) bus: Bus,
}

impl Shared {
    pub(crate) fn new(config: Config, handler: ErrorHandler, bus: Bus) -> Self {
        Self {
            config: RwLock::new(config),
            handler: RwLock::new(handler),
            store: Store::new(),
            bus,
        }
    }

    #[inline]
    pub(crate) fn config(&self) -> Config {
        *self.config.read()
    }

    /// Invokes the error handler; a panicking handler is logged, not propagated.
    pub(crate) fn report(&self, err: &RegistryError) {
        let handler = Arc::clone(&*self.handler.read());
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(err))) {
            tracing::error!(
                label = err.as_label(),
                panic = %describe_panic(&*payload),
                "registry error handler panicked"
            );
        }
    }

    /// Applies one event to the store. Called by the router only.
    pub(crate) fn route(&self, ev: RegistryEvent) -> Result<(), RegistryError> {
        match ev {
            RegistryEvent::Register(handle) => self.register_sync(handle),
            RegistryEvent::Unregister(handle) => {
                self.unregister_sync(&handle);
                Ok(())
            }
            RegistryEvent::Flush(ack) => {
                let _ = ack.send(());
                Ok(())
            }
            #[cfg(test)]
            RegistryEvent::Panic(msg) => panic!("{msg}"),
        }
    }

    fn register_sync(&self, handle: PresenterHandle) -> Result<(), RegistryError> {
        let instance_access = self.config().instance_access;
        let name = Arc::clone(handle.name());
        let type_name = handle.type_name();

        match self.store.insert(handle, instance_access) {
            Insert::Added => {
                tracing::debug!(presenter = %name, type_name, "presenter registered");
                self.bus.publish(|| {
                    Event::new(EventKind::PresenterRegistered)
                        .with_presenter(name)
                        .with_type_name(type_name)
                });
                Ok(())
            }
            Insert::SamePresenter if !instance_access => {
                tracing::debug!(
                    presenter = %name,
                    type_name,
                    "presenter already registered; ignored"
                );
                Ok(())
            }
            Insert::SamePresenter | Insert::SameIdentity => {
                let err = RegistryError::PresenterAlreadyRegistered {
                    type_name,
                    name: name.to_string(),
                };
                self.bus.publish(|| {
                    Event::new(EventKind::PresenterRejected)
                        .with_presenter(name)
                        .with_type_name(type_name)
                        .with_reason(err.as_label())
                });
                Err(err)
            }
        }
    }

    fn unregister_sync(&self, handle: &PresenterHandle) {
        if self.store.remove(handle) {
            tracing::debug!(
                presenter = %handle.name(),
                type_name = handle.type_name(),
                "presenter unregistered"
            );
            self.bus.publish(|| {
                Event::new(EventKind::PresenterUnregistered)
                    .with_presenter(Arc::clone(handle.name()))
                    .with_type_name(handle.type_name())
            });
        }
    }
}

/// Presenter registry handle.
///
/// Built with [`Moviper::builder`] (or [`Moviper::new`]) inside a tokio
/// runtime and shared as `Arc<Moviper>` with every presenter that needs it.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use futures::StreamExt;
/// use moviper::{Config, Moviper, Presenter};
///
/// struct Inbox(String);
/// impl Presenter for Inbox {
///     fn name(&self) -> &str { &self.0 }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let moviper = Moviper::new(Config::enabled());
///
///     let inbox = Arc::new(Inbox("work".into()));
///     moviper.register(&inbox);
///     moviper.flush().await;
///
///     let all: Vec<Arc<Inbox>> = moviper.presenters::<Inbox>()?.collect().await;
///     assert_eq!(all.len(), 1);
///
///     let found = moviper.presenter_instance::<Inbox>("work")?.await;
///     assert!(found.is_some());
///
///     moviper.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct Moviper {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<RegistryEvent>,
    token: CancellationToken,
    router: Mutex<Option<JoinHandle<()>>>,
    fanout: Mutex<Option<Fanout>>,
}

impl Moviper {
    /// Starts building a registry with the given pipeline configuration.
    pub fn builder(cfg: RuntimeConfig) -> MoviperBuilder {
        MoviperBuilder::new(cfg)
    }

    /// Builds a registry with default pipeline settings and the given gates.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(config: Config) -> Arc<Self> {
        Self::builder(RuntimeConfig::default())
            .with_config(config)
            .build()
    }

    pub(crate) fn from_parts(
        shared: Arc<Shared>,
        tx: mpsc::UnboundedSender<RegistryEvent>,
        token: CancellationToken,
        router: JoinHandle<()>,
        fanout: Option<Fanout>,
    ) -> Self {
        Self {
            shared,
            tx,
            token,
            router: Mutex::new(Some(router)),
            fanout: Mutex::new(fanout),
        }
    }

    /// Replaces the active gates. Last write wins; events already enqueued
    /// are processed under whatever config is active when they are applied.
    pub fn set_config(&self, config: Config) {
        *self.shared.config.write() = config;
        self.shared
            .bus
            .publish(|| Event::new(EventKind::ConfigChanged).with_reason(config.to_string()));
    }

    /// Currently active gates.
    pub fn config(&self) -> Config {
        self.shared.config()
    }

    /// Replaces the handler invoked for pipeline errors.
    ///
    /// The default handler logs through `tracing` and continues.
    pub fn set_error_handler<F>(&self, handler: F)
    where
        F: Fn(&RegistryError) + Send + Sync + 'static,
    {
        *self.shared.handler.write() = Arc::new(handler);
    }

    /// Enqueues a registration and returns immediately.
    ///
    /// No-op while presenter access is disabled. A duplicate (see
    /// [`RegistryError::PresenterAlreadyRegistered`]) is reported to the
    /// error handler once the event is processed.
    pub fn register<P: Presenter>(&self, presenter: &Arc<P>) {
        if !self.config().presenter_access {
            tracing::debug!(
                presenter = presenter.name(),
                "presenter access disabled; register ignored"
            );
            return;
        }
        self.submit(RegistryEvent::Register(PresenterHandle::new(presenter)));
    }

    /// Enqueues a removal and returns immediately.
    ///
    /// No-op while presenter access is disabled; removing an absent presenter
    /// is silently ignored.
    pub fn unregister<P: Presenter>(&self, presenter: &Arc<P>) {
        if !self.config().presenter_access {
            tracing::debug!(
                presenter = presenter.name(),
                "presenter access disabled; unregister ignored"
            );
            return;
        }
        self.submit(RegistryEvent::Unregister(PresenterHandle::new(presenter)));
    }

    /// Registers `presenter` and ties its visibility to the returned guard.
    ///
    /// Dropping the guard (or calling [`Registration::detach`]) unregisters.
    pub fn attach<P: Presenter>(self: &Arc<Self>, presenter: &Arc<P>) -> Registration<P> {
        self.register(presenter);
        Registration::new(Arc::clone(self), presenter)
    }

    /// Every registered presenter whose type is exactly `P` (order unspecified).
    ///
    /// The stream scans the collection as it was at call time.
    pub fn presenters<P: Presenter>(&self) -> Result<PresenterStream<P>, QueryError> {
        if !self.config().presenter_access {
            return Err(QueryError::PresenterAccessDisabled);
        }
        Ok(PresenterStream::new(self.shared.store.snapshot(), None))
    }

    /// First registered presenter of type `P` named `name`, if any.
    pub fn presenter_instance<P: Presenter>(
        &self,
        name: &str,
    ) -> Result<impl Future<Output = Option<Arc<P>>> + Send + use<P>, QueryError> {
        let matches = self.instance_stream::<P>(name)?;
        Ok(matches.into_future().map(|(first, _rest)| first))
    }

    /// Like [`Moviper::presenter_instance`], but resolves to
    /// [`QueryError::PresenterNotFound`] instead of `None`.
    pub fn presenter_instance_or_error<P: Presenter>(
        &self,
        name: &str,
    ) -> Result<impl Future<Output = Result<Arc<P>, QueryError>> + Send + use<P>, QueryError> {
        let matches = self.instance_stream::<P>(name)?;
        let name = name.to_string();
        Ok(matches.into_future().map(move |(first, _rest)| {
            first.ok_or_else(|| QueryError::PresenterNotFound {
                type_name: std::any::type_name::<P>(),
                name,
            })
        }))
    }

    fn instance_stream<P: Presenter>(&self, name: &str) -> Result<PresenterStream<P>, QueryError> {
        let config = self.config();
        if !config.instance_access {
            return Err(QueryError::InstanceAccessDisabled);
        }
        if !config.presenter_access {
            return Err(QueryError::PresenterAccessDisabled);
        }
        Ok(PresenterStream::new(
            self.shared.store.snapshot(),
            Some(Arc::from(name)),
        ))
    }

    /// Clears the collection synchronously, bypassing the channel.
    ///
    /// Test isolation only: races with events still in flight.
    pub fn unregister_all(&self) {
        self.shared.store.clear();
    }

    /// Resolves once every event submitted before this call has been applied.
    ///
    /// Resolves immediately if the pipeline is closed.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(RegistryEvent::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.shared.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw receiver of registry events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }

    /// Stops the router, then drains subscriber workers.
    ///
    /// Events still queued are dropped; later submissions report
    /// [`RegistryError::PipelineClosed`].
    pub async fn shutdown(&self) {
        self.token.cancel();

        let router = self.router.lock().take();
        if let Some(router) = router {
            let _ = router.await;
        }
        let fanout = self.fanout.lock().take();
        if let Some(fanout) = fanout {
            fanout.join().await;
        }
    }

    /// `shutdown` ran or the handle is being dropped.
    #[inline]
    pub(crate) fn is_shut_down(&self) -> bool {
        self.token.is_cancelled()
    }

    #[cfg(test)]
    pub(crate) fn inject(&self, ev: RegistryEvent) {
        self.submit(ev);
    }

    fn submit(&self, ev: RegistryEvent) {
        if self.tx.send(ev).is_err() {
            self.shared.report(&RegistryError::PipelineClosed);
        }
    }
}

impl Drop for Moviper {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for Moviper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Moviper")
            .field("config", &self.config())
            .field("len", &self.len())
            .finish()
    }
}
