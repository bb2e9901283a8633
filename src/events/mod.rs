//! Registry events: types and broadcast bus.
//!
//! - [`EventKind`], [`Event`]: classification and payload metadata
//! - `Bus`: crate-private broadcast channel
//!
//! Publishers are the handle (config changes), the router (mutations,
//! rejections, panics, restarts) and the subscriber fan-out (overflow, panics).
//! Consumers are the fan-out and any receiver obtained from
//! [`Moviper::subscribe`](crate::Moviper::subscribe).

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use event::{Event, EventKind};
