//! # Lazy query results.
//!
//! [`PresenterStream`] scans one [`Snapshot`] taken when the query was issued.
//! It never blocks and always terminates: every poll is `Ready`.

use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;

use super::store::Snapshot;
use crate::presenters::Presenter;

/// Finite stream of registered presenters of type `P`.
///
/// Returned by [`Moviper::presenters`](crate::Moviper::presenters); order is
/// unspecified. Presenters dropped after the snapshot was taken are skipped.
pub struct PresenterStream<P> {
    snapshot: Snapshot,
    cursor: usize,
    name: Option<Arc<str>>,
    _type: PhantomData<fn() -> P>,
}

impl<P: Presenter> PresenterStream<P> {
    pub(crate) fn new(snapshot: Snapshot, name: Option<Arc<str>>) -> Self {
        Self {
            snapshot,
            cursor: 0,
            name,
            _type: PhantomData,
        }
    }

    fn next_match(&mut self) -> Option<Arc<P>> {
        while let Some(handle) = self.snapshot.get(self.cursor) {
            self.cursor += 1;
            if !handle.is_type::<P>() {
                continue;
            }
            if let Some(name) = &self.name {
                if handle.name() != name {
                    continue;
                }
            }
            if let Some(presenter) = handle.upgrade::<P>() {
                return Some(presenter);
            }
        }
        None
    }
}

impl<P: Presenter> Stream for PresenterStream<P> {
    type Item = Arc<P>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().next_match())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.snapshot.len().saturating_sub(self.cursor)))
    }
}

impl<P> std::fmt::Debug for PresenterStream<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterStream")
            .field("type_name", &std::any::type_name::<P>())
            .field("name", &self.name)
            .field("remaining", &self.snapshot.len().saturating_sub(self.cursor))
            .finish()
    }
}
