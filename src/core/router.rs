//! # Router: the single consumer of registration events.
//!
//! Owns the receiving end of the ordered channel and applies every event to
//! the [`Store`](super::store::Store) in submission order. It is the only
//! writer of the collection apart from `unregister_all`.
//!
//! ## Event flow
//! ```text
//! recv() ─► catch_unwind(route(ev))
//!             ├─ Ok(Ok)     ─► next event
//!             ├─ Ok(Err(e)) ─► error handler(e) ─► next event
//!             └─ panic      ─► publish RouterPanicked, handler(RouterPanicked)
//!                              ├─ restart.allows(n) ─► publish RouterRestarted, next event
//!                              └─ otherwise         ─► publish RouterStopped, handler(RouterStopped), exit
//! ```
//!
//! ## Rules
//! - Events are applied **sequentially**, never concurrently
//! - A panicking event is consumed; the restart resumes with the following one
//! - Exiting drops the receiver, so later submissions see a closed pipeline

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::registry::Shared;
use crate::{
    error::{RegistryError, describe_panic},
    events::{Event, EventKind},
    policies::RestartPolicy,
    presenters::PresenterHandle,
};

/// One registration intent, consumed once by the router.
pub(crate) enum RegistryEvent {
    Register(PresenterHandle),
    Unregister(PresenterHandle),
    /// Acknowledged once every earlier event has been applied.
    Flush(oneshot::Sender<()>),
    #[cfg(test)]
    Panic(&'static str),
}

pub(crate) struct Router {
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<RegistryEvent>,
    restart: RestartPolicy,
    restarts: u32,
}

impl Router {
    pub(crate) fn new(
        shared: Arc<Shared>,
        rx: mpsc::UnboundedReceiver<RegistryEvent>,
        restart: RestartPolicy,
    ) -> Self {
        Self {
            shared,
            rx,
            restart,
            restarts: 0,
        }
    }

    /// Consumes events until cancellation, channel close, or an exhausted restart policy.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        loop {
            let ev = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(ev) => ev,
                    None => break,
                },
            };

            match panic::catch_unwind(AssertUnwindSafe(|| self.shared.route(ev))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => self.shared.report(&err),
                Err(payload) => {
                    let shared = &self.shared;
                    let reason = describe_panic(&*payload);
                    shared.bus.publish(|| {
                        Event::new(EventKind::RouterPanicked).with_reason(reason.as_str())
                    });
                    shared.report(&RegistryError::RouterPanicked { reason });

                    let restarts = self.restarts;
                    if !self.restart.allows(restarts) {
                        shared.bus.publish(|| {
                            Event::new(EventKind::RouterStopped).with_attempt(restarts)
                        });
                        shared.report(&RegistryError::RouterStopped { restarts });
                        break;
                    }
                    let attempt = restarts.saturating_add(1);
                    self.restarts = attempt;
                    self.shared.bus.publish(|| {
                        Event::new(EventKind::RouterRestarted).with_attempt(attempt)
                    });
                }
            }
        }

        tracing::debug!(restarts = self.restarts, "registry router exited");
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::core::config::Config;
    use crate::events::Bus;

    #[tokio::test]
    async fn restart_counter_saturates_instead_of_overflowing() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let shared = Arc::new(Shared::new(
            Config::enabled(),
            Arc::new(move |err: &RegistryError| sink.lock().push(err.clone())),
            bus,
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let mut router = Router::new(shared, rx, RestartPolicy::Always);
        router.restarts = u32::MAX;

        assert!(tx.send(RegistryEvent::Panic("again")).is_ok());
        drop(tx);
        router.run(CancellationToken::new()).await;

        let restarted = std::iter::from_fn(|| events.try_recv().ok())
            .find(|ev| ev.kind == EventKind::RouterRestarted)
            .expect("restart published");
        assert_eq!(restarted.attempt, Some(u32::MAX));
        assert_eq!(
            *errors.lock(),
            vec![RegistryError::RouterPanicked {
                reason: "again".into()
            }]
        );
    }
}
