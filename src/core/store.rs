//! # Copy-on-write presenter collection.
//!
//! One writer (the router, plus `unregister_all`), any number of readers.
//! Readers clone the current `Arc<Vec<_>>` and scan it without holding the
//! lock; the writer goes through `Arc::make_mut`, which copies the vector only
//! while some reader still holds the previous snapshot.
//!
//! ## Rules
//! - A presenter instance appears at most once
//! - Entries whose presenter was dropped are pruned on every mutation
//! - No ordering guarantee is exposed (scan order is insertion order today)

use std::sync::Arc;

use parking_lot::RwLock;

use crate::presenters::PresenterHandle;

/// Outcome of an insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insert {
    Added,
    /// The very same presenter is already stored.
    SamePresenter,
    /// Another presenter with the same type and name is stored.
    SameIdentity,
}

pub(crate) type Snapshot = Arc<Vec<PresenterHandle>>;

#[derive(Default)]
pub(crate) struct Store {
    entries: RwLock<Snapshot>,
}

impl Store {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current state; never observes a partial mutation.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.entries.read())
    }

    /// Inserts `handle`, refusing the same instance and, when
    /// `unique_identity` is set, the same `(type, name)` pair.
    pub(crate) fn insert(&self, handle: PresenterHandle, unique_identity: bool) -> Insert {
        let mut guard = self.entries.write();
        let entries = Arc::make_mut(&mut *guard);
        entries.retain(PresenterHandle::is_alive);

        if entries.iter().any(|e| e.same_presenter(&handle)) {
            return Insert::SamePresenter;
        }
        if unique_identity && entries.iter().any(|e| e.same_identity(&handle)) {
            return Insert::SameIdentity;
        }
        entries.push(handle);
        Insert::Added
    }

    /// Removes `handle`'s presenter; `false` if it was not stored.
    pub(crate) fn remove(&self, handle: &PresenterHandle) -> bool {
        let mut guard = self.entries.write();
        let entries = Arc::make_mut(&mut *guard);
        let removed = match entries.iter().position(|e| e.same_presenter(handle)) {
            Some(idx) => {
                entries.swap_remove(idx);
                true
            }
            None => false,
        };
        entries.retain(PresenterHandle::is_alive);
        removed
    }

    pub(crate) fn clear(&self) {
        *self.entries.write() = Arc::new(Vec::new());
    }

    /// Live entries; dropped presenters awaiting pruning are not counted.
    pub(crate) fn len(&self) -> usize {
        self.entries.read().iter().filter(|e| e.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Presenter;

    struct Foo(&'static str);
    impl Presenter for Foo {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn same_presenter_is_stored_once() {
        let store = Store::new();
        let foo = Arc::new(Foo("a"));

        assert_eq!(store.insert(PresenterHandle::new(&foo), false), Insert::Added);
        assert_eq!(store.insert(PresenterHandle::new(&foo), false), Insert::SamePresenter);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn identity_check_only_when_requested() {
        let store = Store::new();
        let first = Arc::new(Foo("a"));
        let second = Arc::new(Foo("a"));

        assert_eq!(store.insert(PresenterHandle::new(&first), true), Insert::Added);
        assert_eq!(store.insert(PresenterHandle::new(&second), true), Insert::SameIdentity);
        assert_eq!(store.insert(PresenterHandle::new(&second), false), Insert::Added);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let store = Store::new();
        let a = Arc::new(Foo("a"));
        let b = Arc::new(Foo("b"));
        store.insert(PresenterHandle::new(&a), true);

        let before = store.snapshot();
        store.insert(PresenterHandle::new(&b), true);
        assert!(store.remove(&PresenterHandle::new(&a)));

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].name().as_ref(), "a");
        assert_eq!(store.snapshot()[0].name().as_ref(), "b");
    }

    #[test]
    fn removing_absent_presenter_is_a_no_op() {
        let store = Store::new();
        let a = Arc::new(Foo("a"));
        assert!(!store.remove(&PresenterHandle::new(&a)));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn dropped_presenters_are_pruned_on_mutation() {
        let store = Store::new();
        let gone = Arc::new(Foo("gone"));
        let kept = Arc::new(Foo("kept"));
        store.insert(PresenterHandle::new(&gone), true);
        drop(gone);

        store.insert(PresenterHandle::new(&kept), true);
        assert_eq!(store.len(), 1);

        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn len_skips_dropped_presenters_before_pruning() {
        let store = Store::new();
        let gone = Arc::new(Foo("gone"));
        store.insert(PresenterHandle::new(&gone), true);
        assert_eq!(store.len(), 1);

        drop(gone);
        assert_eq!(store.len(), 0);
        assert_eq!(store.snapshot().len(), 1);
    }
}
