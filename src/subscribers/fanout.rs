//! # Fan-out of registry events to subscribers.
//!
//! Built by [`MoviperBuilder`](crate::MoviperBuilder) when subscribers are
//! configured. One listener task reads the bus and hands each event to the
//! lanes whose [`EventFilter`](crate::EventFilter) accepts its kind; every lane
//! is a bounded queue drained by its own worker.
//!
//! ```text
//! Bus ──► listener ──► lane(filter, queue) ──► worker ──► on_event()
//!             │                                  └─► panic ─► SubscriberPanicked
//!             └─ queue full/closed ─► SubscriberOverflow
//! ```
//!
//! On shutdown the listener drains what the bus still buffers, then drops the
//! lanes; workers finish their queues and exit.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{EventFilter, Subscribe};
use crate::error::describe_panic;
use crate::events::{Bus, Event, EventKind};

struct Lane {
    name: &'static str,
    filter: EventFilter,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Lanes plus the bus that delivery problems are reported to.
struct Lanes {
    lanes: Vec<Lane>,
    bus: Bus,
}

impl Lanes {
    fn dispatch(&self, ev: Event) {
        if !self.lanes.iter().any(|l| l.filter.accepts(ev.kind)) {
            return;
        }
        let ev = Arc::new(ev);
        for lane in self.lanes.iter().filter(|l| l.filter.accepts(ev.kind)) {
            let reason = match lane.queue.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Closed(_)) => "closed",
            };
            tracing::warn!(subscriber = lane.name, reason, seq = ev.seq, "event dropped");
            // An overflow report that overflows itself is only logged.
            if ev.kind != EventKind::SubscriberOverflow {
                self.bus.publish(|| Event::subscriber_overflow(lane.name, reason));
            }
        }
    }
}

pub(crate) struct Fanout {
    listener: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl Fanout {
    /// Spawns one worker per subscriber and the bus listener.
    pub(crate) fn spawn(
        subscribers: Vec<Arc<dyn Subscribe>>,
        bus: &Bus,
        token: CancellationToken,
    ) -> Self {
        let mut lanes = Vec::with_capacity(subscribers.len());
        let mut workers = Vec::with_capacity(subscribers.len());

        for sub in subscribers {
            let (queue, rx) = mpsc::channel(sub.queue_capacity().max(1));
            lanes.push(Lane {
                name: sub.name(),
                filter: sub.filter(),
                queue,
            });
            workers.push(tokio::spawn(deliver(sub, rx, bus.clone())));
        }

        let lanes = Lanes {
            lanes,
            bus: bus.clone(),
        };
        let listener = tokio::spawn(listen(bus.subscribe(), lanes, token));
        Self { listener, workers }
    }

    /// Waits for the listener to drain, then for every worker to finish.
    /// The token passed to [`Fanout::spawn`] must be cancelled first.
    pub(crate) async fn join(self) {
        let _ = self.listener.await;
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

async fn listen(
    mut rx: broadcast::Receiver<Event>,
    lanes: Lanes,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            msg = rx.recv() => match msg {
                Ok(ev) => lanes.dispatch(ev),
                Err(RecvError::Closed) => return,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber fan-out lagged");
                }
            },
        }
    }

    loop {
        match rx.try_recv() {
            Ok(ev) => lanes.dispatch(ev),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "subscriber fan-out lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

async fn deliver(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let outcome = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(payload) = outcome {
            let info = describe_panic(&*payload);
            tracing::error!(subscriber = sub.name(), %info, "subscriber panicked");
            bus.publish(|| Event::subscriber_panicked(sub.name(), info));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct Counter {
        filter: EventFilter,
        capacity: usize,
        seen: AtomicUsize,
    }

    impl Counter {
        fn new(filter: EventFilter) -> Arc<Self> {
            Self::with_capacity(filter, 64)
        }

        fn with_capacity(filter: EventFilter, capacity: usize) -> Arc<Self> {
            Arc::new(Self {
                filter,
                capacity,
                seen: AtomicUsize::new(0),
            })
        }

        fn seen(&self) -> usize {
            self.seen.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }

        fn filter(&self) -> EventFilter {
            self.filter
        }

        fn queue_capacity(&self) -> usize {
            self.capacity
        }
    }

    struct Exploding;

    #[async_trait]
    impl Subscribe for Exploding {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }

        fn filter(&self) -> EventFilter {
            EventFilter::Membership
        }
    }

    fn publish(bus: &Bus, kinds: &[EventKind]) {
        for &kind in kinds {
            bus.publish(|| Event::new(kind));
        }
    }

    #[tokio::test]
    async fn lanes_receive_only_accepted_kinds() {
        let bus = Bus::new(16);
        let token = CancellationToken::new();
        let everything = Counter::new(EventFilter::All);
        let membership = Counter::new(EventFilter::Membership);
        let panics = Counter::new(EventFilter::Kinds(&[EventKind::RouterPanicked]));
        let subs: Vec<Arc<dyn Subscribe>> = vec![
            everything.clone() as Arc<dyn Subscribe>,
            membership.clone() as Arc<dyn Subscribe>,
            panics.clone() as Arc<dyn Subscribe>,
        ];
        let fanout = Fanout::spawn(subs, &bus, token.clone());

        publish(
            &bus,
            &[
                EventKind::PresenterRegistered,
                EventKind::ConfigChanged,
                EventKind::PresenterRejected,
                EventKind::RouterPanicked,
            ],
        );
        token.cancel();
        fanout.join().await;

        assert_eq!(everything.seen(), 4);
        assert_eq!(membership.seen(), 2);
        assert_eq!(panics.seen(), 1);
    }

    #[tokio::test]
    async fn panicking_subscriber_is_reported_on_the_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let subs = vec![Arc::new(Exploding) as Arc<dyn Subscribe>];
        let fanout = Fanout::spawn(subs, &bus, token.clone());

        publish(&bus, &[EventKind::PresenterUnregistered]);
        token.cancel();
        fanout.join().await;

        let first = rx.try_recv().expect("published");
        assert_eq!(first.kind, EventKind::PresenterUnregistered);
        let ev = rx.try_recv().expect("panic report");
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.presenter.as_deref(), Some("exploding"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
    }

    #[tokio::test]
    async fn full_lane_drops_and_reports_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let slow = Counter::with_capacity(EventFilter::Membership, 1);
        let fanout = Fanout::spawn(vec![slow.clone() as Arc<dyn Subscribe>], &bus, token.clone());

        // Dispatch happens in one drain pass, before the worker first runs.
        publish(&bus, &[EventKind::PresenterRegistered; 3]);
        token.cancel();
        fanout.join().await;

        assert_eq!(slow.seen(), 1);
        let overflows: Vec<Event> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter(|ev| ev.kind == EventKind::SubscriberOverflow)
            .collect();
        assert_eq!(overflows.len(), 2);
        assert_eq!(overflows[0].reason.as_deref(), Some("full"));
    }
}
