//! # Observing the registry.
//!
//! Implement [`Subscribe`] and pass it to
//! [`MoviperBuilder::with_subscribers`](crate::MoviperBuilder::with_subscribers).
//! An [`EventFilter`] narrows what reaches each subscriber. With the `logging`
//! feature, [`LogWriter`] forwards events to `tracing`.
//!
//! ```text
//! Router ── Event ──► Bus ──► Fanout ──┬─► [Membership] ──► crash reporter
//!                                      ├─► [All]        ──► LogWriter
//!                                      └─► [Kinds(..)]  ──► custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use moviper::{Event, EventFilter, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Rejections;
//!
//! #[async_trait]
//! impl Subscribe for Rejections {
//!     async fn on_event(&self, event: &Event) {
//!         // report to crash analytics
//!         let _ = (event.presenter.as_deref(), event.type_name);
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "rejections"
//!     }
//!
//!     fn filter(&self) -> EventFilter {
//!         EventFilter::Kinds(&[EventKind::PresenterRejected])
//!     }
//! }
//! ```

mod fanout;
mod filter;
#[cfg(feature = "logging")]
mod log;
mod subscribe;

pub(crate) use fanout::Fanout;
pub use filter::EventFilter;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
