//! # LogWriter: tracing-backed event writer
//!
//! A minimal subscriber that forwards incoming [`Event`]s to `tracing` under
//! the `moviper` target. Install a `tracing` subscriber in the application to
//! see the output.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO moviper: registered seq=3 presenter="inbox" type_name="app::InboxPresenter"
//! WARN moviper: rejected seq=4 presenter="inbox" reason="presenter_already_registered"
//! ERROR moviper: router panicked seq=5 reason="..."
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let seq = e.seq;
        let presenter = e.presenter.as_deref().unwrap_or("-");
        let type_name = e.type_name.unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::PresenterRegistered => {
                tracing::info!(target: "moviper", seq, presenter, type_name, "registered");
            }
            EventKind::PresenterUnregistered => {
                tracing::info!(target: "moviper", seq, presenter, type_name, "unregistered");
            }
            EventKind::PresenterRejected => {
                tracing::warn!(
                    target: "moviper",
                    seq,
                    presenter,
                    type_name,
                    reason,
                    "rejected"
                );
            }
            EventKind::ConfigChanged => {
                tracing::info!(target: "moviper", seq, config = reason, "config changed");
            }
            EventKind::RouterPanicked => {
                tracing::error!(target: "moviper", seq, reason, "router panicked");
            }
            EventKind::RouterRestarted => {
                tracing::warn!(target: "moviper", seq, restart = ?e.attempt, "router restarted");
            }
            EventKind::RouterStopped => {
                tracing::error!(target: "moviper", seq, restarts = ?e.attempt, "router stopped");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(
                    target: "moviper",
                    seq,
                    subscriber = presenter,
                    reason,
                    "subscriber overflow"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    target: "moviper",
                    seq,
                    subscriber = presenter,
                    reason,
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
