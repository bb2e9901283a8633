//! Registry core: pipeline and lifecycle.
//!
//! The public API from this module is [`Moviper`] (with its builder, query
//! stream and registration guard) plus the two configuration types.
//!
//! Internal modules:
//! - [`store`]: copy-on-write presenter collection;
//! - [`router`]: single consumer of registration events, supervised restarts;
//! - [`query`]: lazy stream over a collection snapshot;
//! - [`registry`]: the handle, gates and error routing;
//! - [`builder`]: wiring of bus, router and subscriber workers.

mod builder;
mod config;
mod query;
mod registration;
mod registry;
mod router;
mod store;


pub use builder::MoviperBuilder;
pub use config::{Config, RuntimeConfig};
pub use query::PresenterStream;
pub use registration::Registration;
pub use registry::{ErrorHandler, Moviper};
