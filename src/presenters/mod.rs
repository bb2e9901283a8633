//! # Presenter abstractions.
//!
//! This module provides the presenter-side types:
//! - [`Presenter`] - trait every registrable presenter implements
//! - [`ViewPresenter`] - lifecycle hooks a view drives (attach/detach/destroy)
//! - [`PresenterList`] - composite broadcasting lifecycle calls to its members

mod handle;
mod list;
mod presenter;

pub(crate) use handle::PresenterHandle;
pub use list::PresenterList;
pub use presenter::{Presenter, ViewPresenter, unique_name};
