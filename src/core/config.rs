//! # Registry configuration.
//!
//! Two layers of settings:
//! 1. [`Config`]: the access gates, replaceable at any time via
//!    [`Moviper::set_config`](crate::Moviper::set_config) and read by every operation.
//! 2. [`RuntimeConfig`]: construction-time knobs of the pipeline, passed to
//!    [`Moviper::builder`](crate::Moviper::builder).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

use std::fmt;

use crate::policies::RestartPolicy;

/// Access gates of the registry.
///
/// The default (both gates off) is the Unconfigured state: `register` and
/// `unregister` are no-ops and every query fails.
///
/// # Example
/// ```
/// use moviper::Config;
///
/// let cfg = Config::default()
///     .with_presenter_access(true)
///     .with_instance_access(true);
/// assert_eq!(cfg, Config::enabled());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Gates register/unregister and every query.
    pub presenter_access: bool,
    /// Gates duplicate detection and named-instance lookup.
    pub instance_access: bool,
}

impl Config {
    /// Both gates enabled.
    pub const fn enabled() -> Self {
        Self {
            presenter_access: true,
            instance_access: true,
        }
    }

    #[must_use]
    pub const fn with_presenter_access(mut self, enabled: bool) -> Self {
        self.presenter_access = enabled;
        self
    }

    #[must_use]
    pub const fn with_instance_access(mut self, enabled: bool) -> Self {
        self.instance_access = enabled;
        self
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "presenter_access={} instance_access={}",
            self.presenter_access, self.instance_access
        )
    }
}

/// Construction-time configuration of the registration pipeline.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `restart`: What the router does after a panic while applying an event
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` messages observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Supervision policy of the router.
    pub restart: RestartPolicy,
}

impl RuntimeConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RuntimeConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `restart = RestartPolicy::Always`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            restart: RestartPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconfigured() {
        let cfg = Config::default();
        assert!(!cfg.presenter_access);
        assert!(!cfg.instance_access);
        assert_eq!(cfg.to_string(), "presenter_access=false instance_access=false");
    }

    #[test]
    fn gates_are_independent() {
        let cfg = Config::default().with_instance_access(true);
        assert!(!cfg.presenter_access);
        assert!(cfg.instance_access);
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = RuntimeConfig {
            bus_capacity: 0,
            ..RuntimeConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(RuntimeConfig::default().bus_capacity_clamped(), 1024);
    }
}
