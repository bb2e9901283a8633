//! # Restart policies for the registry router.
//!
//! [`RestartPolicy`] determines whether the router keeps consuming registration
//! events after applying one of them panicked.
//!
//! - [`RestartPolicy::Always`] resume with the next event, forever (default).
//! - [`RestartPolicy::Limited`] resume at most `max_restarts` times.
//! - [`RestartPolicy::Never`] stop after the first panic.
//!
//! ```text
//! panic while applying event #n
//!   ├─► report RouterPanicked to the error handler
//!   ├─► allows(restarts)?
//!   │     ├─ yes ─► restarts += 1, publish RouterRestarted, consume event #n+1
//!   │     └─ no  ─► publish RouterStopped, report RouterStopped, exit
//! ```

/// Policy controlling whether the router resumes after a panic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Never restart: the first panic stops the pipeline.
    Never,
    /// Restart at most `max_restarts` times over the router's lifetime.
    Limited {
        /// Upper bound on restarts.
        max_restarts: u32,
    },
    /// Always restart (default).
    #[default]
    Always,
}

impl RestartPolicy {
    /// Returns `true` if another restart is permitted after `restarts` restarts.
    #[inline]
    pub fn allows(&self, restarts: u32) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::Limited { max_restarts } => restarts < *max_restarts,
            RestartPolicy::Always => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_always() {
        assert_eq!(RestartPolicy::default(), RestartPolicy::Always);
        assert!(RestartPolicy::Always.allows(u32::MAX));
    }

    #[test]
    fn limited_counts_restarts() {
        let policy = RestartPolicy::Limited { max_restarts: 2 };
        assert!(policy.allows(0));
        assert!(policy.allows(1));
        assert!(!policy.allows(2));
    }

    #[test]
    fn never_refuses_first_restart() {
        assert!(!RestartPolicy::Never.allows(0));
    }
}
