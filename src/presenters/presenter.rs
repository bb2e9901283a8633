//! # Presenter traits.
//!
//! A [`Presenter`] is the unit tracked by the registry. It has a stable
//! [`name`](Presenter::name) used for named-instance lookup; its concrete Rust
//! type is the type tag used by [`Moviper::presenters`](crate::Moviper::presenters).
//!
//! [`ViewPresenter`] adds the lifecycle hooks a view drives. The registry never
//! calls them; they exist so that composites such as
//! [`PresenterList`](crate::PresenterList) can broadcast them.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// # Registrable presenter.
///
/// # Example
/// ```
/// use moviper::Presenter;
///
/// struct InboxPresenter {
///     account: String,
/// }
///
/// impl Presenter for InboxPresenter {
///     fn name(&self) -> &str {
///         &self.account
///     }
/// }
/// ```
pub trait Presenter: Any + Send + Sync {
    /// Returns a stable, human-readable presenter name.
    ///
    /// With instance access enabled, two presenters of the same type must not
    /// share a name; the second registration is rejected. Presenters without
    /// a natural name can store one from [`unique_name`] at construction.
    fn name(&self) -> &str;
}

/// Process-unique name for a presenter of type `P`: `"<Type>_<n>"`.
///
/// ```
/// let first = moviper::unique_name::<String>();
/// let second = moviper::unique_name::<String>();
/// assert!(first.starts_with("String_"));
/// assert_ne!(first, second);
/// ```
pub fn unique_name<P: ?Sized>() -> String {
    let full = std::any::type_name::<P>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);
    format!("{short}_{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Lifecycle hooks driven by a view of type `V`.
pub trait ViewPresenter<V: ?Sized>: Presenter {
    /// View became visible; the presenter may start pushing state to it.
    fn attach_view(&self, view: &Arc<V>);

    /// View is going away. With `retain_instance` the presenter survives
    /// (e.g. configuration change) and must keep its background work.
    fn detach_view(&self, retain_instance: bool);

    /// Presenter will never be attached again.
    fn destroy(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    mod app {
        pub struct Feed<T>(pub T);
    }

    #[test]
    fn unique_name_uses_the_short_type_name() {
        let a = unique_name::<app::Feed<u8>>();
        let b = unique_name::<app::Feed<u8>>();

        assert!(a.starts_with("Feed_"), "{a}");
        assert_ne!(a, b);
    }
}
