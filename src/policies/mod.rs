//! Supervision policies.
//!
//! ## Contents
//! - [`RestartPolicy`] whether the router resumes consuming events after a panic
//!
//! ## Quick wiring
//! ```text
//! RuntimeConfig { restart: RestartPolicy, .. }
//!      └─► core::router::Router uses restart.allows(restarts_so_far)
//!          to decide resume/stop after a caught panic
//! ```

mod restart;

pub use restart::RestartPolicy;
