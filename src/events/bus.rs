//! # Registry event bus.
//!
//! Crate-private broadcast channel shared by the handle, the router and the
//! subscriber fan-out. Applications observe it through
//! [`Moviper::subscribe`](crate::Moviper::subscribe) or a
//! [`Subscribe`](crate::Subscribe) implementation.
//!
//! Events are built lazily: [`Bus::publish`] takes a constructor and skips it
//! entirely while nothing is listening, so a registry without observers pays
//! no allocation per mutation.

use tokio::sync::broadcast;

use super::event::Event;

#[derive(Clone, Debug)]
pub(crate) struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Ring buffer of `capacity` events (min 1), shared by every receiver.
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes the event built by `make`, if anyone listens.
    pub(crate) fn publish(&self, make: impl FnOnce() -> Event) {
        if self.tx.receiver_count() == 0 {
            return;
        }
        let _ = self.tx.send(make());
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn events_are_built_only_for_listeners() {
        let bus = Bus::new(0);
        let mut built = 0;
        bus.publish(|| {
            built += 1;
            Event::new(EventKind::ConfigChanged)
        });
        assert_eq!(built, 0);

        let mut rx = bus.subscribe();
        bus.publish(|| Event::new(EventKind::RouterRestarted).with_attempt(1));

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::RouterRestarted);
        assert_eq!(ev.attempt, Some(1));
        assert!(rx.try_recv().is_err());
    }
}
