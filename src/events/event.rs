//! # Events emitted by the presenter registry.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Membership events**: presenters entering or leaving the collection, rejections
//! - **Router events**: supervision of the single consumer (panics, restarts, stop)
//! - **Subscriber events**: delivery problems inside the fan-out workers
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Membership events are published by the router in the order they were applied.
//!
//! ## Example
//! ```rust
//! use moviper::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::PresenterRejected)
//!     .with_presenter("inbox")
//!     .with_type_name("app::InboxPresenter")
//!     .with_reason("presenter_already_registered");
//!
//! assert_eq!(ev.kind, EventKind::PresenterRejected);
//! assert_eq!(ev.presenter.as_deref(), Some("inbox"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Membership events ===
    /// Presenter became visible to queries.
    ///
    /// Sets: `presenter`, `type_name`
    PresenterRegistered,

    /// Presenter was removed from the collection.
    ///
    /// Sets: `presenter`, `type_name`
    PresenterUnregistered,

    /// Registration was rejected as a duplicate.
    ///
    /// Sets: `presenter`, `type_name`, `reason`
    PresenterRejected,

    /// Active [`Config`](crate::Config) was replaced.
    ///
    /// Sets: `reason` (rendered flags)
    ConfigChanged,

    // === Router events ===
    /// Applying an event panicked.
    ///
    /// Sets: `reason` (panic message)
    RouterPanicked,

    /// Router resumed consumption after a panic.
    ///
    /// Sets: `attempt` (restart count, 1-based)
    RouterRestarted,

    /// Router stopped consuming; the restart policy forbids continuation.
    ///
    /// Sets: `attempt` (restarts performed)
    RouterStopped,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `presenter` (subscriber name), `reason` (panic info)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `presenter` (subscriber name), `reason` ("full" or "closed")
    SubscriberOverflow,
}

impl EventKind {
    /// Presenter entered, left, or was refused entry to the collection.
    pub fn is_membership(self) -> bool {
        matches!(
            self,
            EventKind::PresenterRegistered
                | EventKind::PresenterUnregistered
                | EventKind::PresenterRejected
        )
    }

    /// Router or subscriber failure and recovery.
    pub fn is_supervision(self) -> bool {
        matches!(
            self,
            EventKind::RouterPanicked
                | EventKind::RouterRestarted
                | EventKind::RouterStopped
                | EventKind::SubscriberPanicked
                | EventKind::SubscriberOverflow
        )
    }
}

/// Registry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Presenter (or subscriber) name, if applicable.
    pub presenter: Option<Arc<str>>,
    /// Rust type name of the presenter, if applicable.
    pub type_name: Option<&'static str>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Restart counter for router events.
    pub attempt: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            presenter: None,
            type_name: None,
            reason: None,
            attempt: None,
        }
    }

    /// Attaches a presenter name.
    #[inline]
    pub fn with_presenter(mut self, name: impl Into<Arc<str>>) -> Self {
        self.presenter = Some(name.into());
        self
    }

    /// Attaches a presenter type name.
    #[inline]
    pub fn with_type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a restart counter.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_presenter(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_presenter(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_membership(&self) -> bool {
        self.kind.is_membership()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::PresenterRegistered);
        let b = Event::new(EventKind::PresenterUnregistered);
        assert!(b.seq > a.seq);
        assert!(a.is_membership());
        assert!(!Event::new(EventKind::RouterStopped).is_membership());
    }
}
