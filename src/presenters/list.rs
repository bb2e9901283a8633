//! # PresenterList: several presenters behind one view.
//!
//! Broadcasts every lifecycle call to each member in insertion order. The
//! composite is itself a [`Presenter`]; its name lists its members:
//!
//! ```text
//! PresenterList - contents: header feed footer 
//! ```

use std::sync::Arc;

use super::{Presenter, ViewPresenter};

const NAME_PREFIX: &str = "PresenterList - contents: ";

/// Composite presenter for views driven by more than one presenter.
pub struct PresenterList<V: ?Sized + 'static> {
    members: Vec<Arc<dyn ViewPresenter<V>>>,
    name: String,
}

impl<V: ?Sized + 'static> PresenterList<V> {
    /// Creates a composite over `members`, keeping their order.
    pub fn new(members: Vec<Arc<dyn ViewPresenter<V>>>) -> Self {
        let name = members.iter().fold(NAME_PREFIX.to_string(), |mut all, p| {
            all.push_str(p.name());
            all.push(' ');
            all
        });
        Self { members, name }
    }

    /// Members in broadcast order.
    pub fn members(&self) -> &[Arc<dyn ViewPresenter<V>>] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<V: ?Sized + 'static> Presenter for PresenterList<V> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<V: ?Sized + 'static> ViewPresenter<V> for PresenterList<V> {
    fn attach_view(&self, view: &Arc<V>) {
        self.members.iter().for_each(|p| p.attach_view(view));
    }

    fn detach_view(&self, retain_instance: bool) {
        self.members.iter().for_each(|p| p.detach_view(retain_instance));
    }

    fn destroy(&self) {
        self.members.iter().for_each(|p| p.destroy());
    }
}

/// Member-wise instance identity.
impl<V: ?Sized + 'static> PartialEq for PresenterList<V> {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(&other.members)
                .all(|(a, b)| std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)))
    }
}

impl<V: ?Sized + 'static> Eq for PresenterList<V> {}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    struct View;

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Presenter for Recording {
        fn name(&self) -> &str {
            self.name
        }
    }

    impl ViewPresenter<View> for Recording {
        fn attach_view(&self, _view: &Arc<View>) {
            self.log.lock().push(format!("attach:{}", self.name));
        }

        fn detach_view(&self, retain_instance: bool) {
            self.log.lock().push(format!("detach:{}:{retain_instance}", self.name));
        }

        fn destroy(&self) {
            self.log.lock().push(format!("destroy:{}", self.name));
        }
    }

    fn member(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn ViewPresenter<View>> {
        Arc::new(Recording {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn name_concatenates_members() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let list = PresenterList::new(vec![member("header", &log), member("feed", &log)]);
        assert_eq!(list.name(), "PresenterList - contents: header feed ");
        assert_eq!(PresenterList::<View>::new(Vec::new()).name(), NAME_PREFIX);
    }

    #[test]
    fn broadcasts_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let list = PresenterList::new(vec![member("a", &log), member("b", &log)]);

        list.attach_view(&Arc::new(View));
        list.detach_view(true);
        list.destroy();

        assert_eq!(
            *log.lock(),
            vec![
                "attach:a", "attach:b", "detach:a:true", "detach:b:true", "destroy:a", "destroy:b",
            ]
        );
    }

    #[test]
    fn equality_is_member_identity() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = member("a", &log);
        let b = member("b", &log);

        let first = PresenterList::new(vec![Arc::clone(&a), Arc::clone(&b)]);
        let same = PresenterList::new(vec![Arc::clone(&a), Arc::clone(&b)]);
        let reordered = PresenterList::new(vec![b, a]);
        let lookalike = PresenterList::new(vec![member("a", &log), member("b", &log)]);

        assert!(first == same);
        assert!(first != reordered);
        assert!(first != lookalike);
    }
}
