//! # Interactor support.
//!
//! An interactor performs data/business operations on behalf of a presenter.
//! It holds no presenter reference: results travel back through the
//! receivers returned by [`InteractorScope::spawn`].

mod scope;

pub use scope::InteractorScope;
