//! # Registration guard.
//!
//! Ties a presenter's registry visibility to a lexical or lifecycle span:
//! [`Moviper::attach`](crate::Moviper::attach) registers, dropping the guard
//! unregisters. The guard holds only a `Weak` to the presenter.

use std::sync::{Arc, Weak};

use super::registry::Moviper;
use crate::presenters::Presenter;

/// Unregisters its presenter when dropped.
#[must_use = "dropping a Registration unregisters the presenter"]
pub struct Registration<P: Presenter> {
    registry: Arc<Moviper>,
    presenter: Weak<P>,
}

impl<P: Presenter> Registration<P> {
    pub(crate) fn new(registry: Arc<Moviper>, presenter: &Arc<P>) -> Self {
        Self {
            registry,
            presenter: Arc::downgrade(presenter),
        }
    }

    /// The registered presenter, unless its owner already dropped it.
    pub fn presenter(&self) -> Option<Arc<P>> {
        self.presenter.upgrade()
    }

    /// Detach hook: unregisters now.
    pub fn detach(self) {
        drop(self);
    }
}

impl<P: Presenter> Drop for Registration<P> {
    fn drop(&mut self) {
        // A dropped presenter is pruned by the router on its next mutation.
        let Some(presenter) = self.presenter.upgrade() else {
            return;
        };
        if self.registry.is_shut_down() {
            tracing::debug!(presenter = presenter.name(), "registry shut down; unregister skipped");
            return;
        }
        self.registry.unregister(&presenter);
    }
}
