use crate::events::EventKind;

/// Which registry events a subscriber's lane receives.
///
/// Events a filter rejects never enter the subscriber's queue, so they can
/// neither fill it nor cause an overflow report.
///
/// ```
/// use moviper::{EventFilter, EventKind};
///
/// assert!(EventFilter::Membership.accepts(EventKind::PresenterRejected));
/// assert!(!EventFilter::Membership.accepts(EventKind::RouterPanicked));
///
/// let crashes = EventFilter::Kinds(&[EventKind::RouterPanicked, EventKind::SubscriberPanicked]);
/// assert!(crashes.accepts(EventKind::SubscriberPanicked));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventFilter {
    /// Every event (default).
    #[default]
    All,
    /// Presenters registered, unregistered or rejected.
    Membership,
    /// Router panics, restarts and stops, plus subscriber delivery problems.
    Supervision,
    /// An explicit set of kinds.
    Kinds(&'static [EventKind]),
}

impl EventFilter {
    pub fn accepts(&self, kind: EventKind) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Membership => kind.is_membership(),
            EventFilter::Supervision => kind.is_supervision(),
            EventFilter::Kinds(kinds) => kinds.contains(&kind),
        }
    }
}
