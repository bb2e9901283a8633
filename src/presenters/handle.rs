use std::any::{Any, TypeId};
use std::sync::{Arc, Weak};

use super::Presenter;

/// Non-owning registry entry for one presenter.
///
/// The type tag and name are captured at registration time. The `Weak`
/// pointer also serves as identity: its allocation stays reserved while any
/// handle exists, so `Weak::ptr_eq` never confuses two presenters.
#[derive(Clone)]
pub(crate) struct PresenterHandle {
    type_id: TypeId,
    type_name: &'static str,
    name: Arc<str>,
    weak: Weak<dyn Any + Send + Sync>,
}

impl PresenterHandle {
    pub(crate) fn new<P: Presenter>(presenter: &Arc<P>) -> Self {
        let weak: Weak<P> = Arc::downgrade(presenter);
        Self {
            type_id: TypeId::of::<P>(),
            type_name: std::any::type_name::<P>(),
            name: Arc::from(presenter.name()),
            weak,
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Presenter has not been dropped by its owner yet.
    #[inline]
    pub(crate) fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Same presenter instance.
    #[inline]
    pub(crate) fn same_presenter(&self, other: &PresenterHandle) -> bool {
        Weak::ptr_eq(&self.weak, &other.weak)
    }

    /// Same type tag and name.
    #[inline]
    pub(crate) fn same_identity(&self, other: &PresenterHandle) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }

    #[inline]
    pub(crate) fn is_type<P: Presenter>(&self) -> bool {
        self.type_id == TypeId::of::<P>()
    }

    /// Upgrades to a strong reference of the concrete type.
    pub(crate) fn upgrade<P: Presenter>(&self) -> Option<Arc<P>> {
        if !self.is_type::<P>() {
            return None;
        }
        self.weak.upgrade()?.downcast::<P>().ok()
    }
}

impl std::fmt::Debug for PresenterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenterHandle")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Foo(&'static str);
    impl Presenter for Foo {
        fn name(&self) -> &str {
            self.0
        }
    }

    struct Bar(&'static str);
    impl Presenter for Bar {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn upgrade_checks_type_tag() {
        let foo = Arc::new(Foo("a"));
        let handle = PresenterHandle::new(&foo);

        assert!(handle.is_type::<Foo>());
        assert!(handle.upgrade::<Bar>().is_none());
        let back = handle.upgrade::<Foo>().expect("alive");
        assert!(Arc::ptr_eq(&back, &foo));
    }

    #[test]
    fn identity_and_instance_are_distinct() {
        let first = Arc::new(Foo("a"));
        let second = Arc::new(Foo("a"));
        let other_type = Arc::new(Bar("a"));

        let h1 = PresenterHandle::new(&first);
        let h1_again = PresenterHandle::new(&first);
        let h2 = PresenterHandle::new(&second);
        let h3 = PresenterHandle::new(&other_type);

        assert!(h1.same_presenter(&h1_again));
        assert!(!h1.same_presenter(&h2));
        assert!(h1.same_identity(&h2));
        assert!(!h1.same_identity(&h3));
    }

    #[test]
    fn dropped_presenter_is_not_alive() {
        let foo = Arc::new(Foo("gone"));
        let handle = PresenterHandle::new(&foo);
        drop(foo);

        assert!(!handle.is_alive());
        assert!(handle.upgrade::<Foo>().is_none());
    }
}
