//! Error types used by the presenter registry.
//!
//! This module defines two main error enums:
//!
//! - [`QueryError`] - errors returned to the caller of a query (or gate check).
//! - [`RegistryError`] - errors raised by the registration pipeline, delivered
//!   to the registry's error handler because the `register` call
//!   has already returned.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::any::Any;

use thiserror::Error;

/// # Errors returned to query callers.
///
/// Configuration gates fail synchronously at the call site; `PresenterNotFound`
/// surfaces through the result of the `_or_error` lookup.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Presenter access was never enabled via [`Config::with_presenter_access`](crate::Config::with_presenter_access).
    #[error("presenter access is not enabled")]
    PresenterAccessDisabled,

    /// Named instance access was never enabled via [`Config::with_instance_access`](crate::Config::with_instance_access).
    #[error("presenter instance access is not enabled")]
    InstanceAccessDisabled,

    /// No registered presenter matches the requested type and name.
    #[error("presenter {type_name} named {name:?} not found")]
    PresenterNotFound {
        /// Rust type name of the requested presenter.
        type_name: &'static str,
        /// Requested instance name.
        name: String,
    },
}

impl QueryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use moviper::QueryError;
    ///
    /// assert_eq!(QueryError::InstanceAccessDisabled.as_label(), "instance_access_disabled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            QueryError::PresenterAccessDisabled => "presenter_access_disabled",
            QueryError::InstanceAccessDisabled => "instance_access_disabled",
            QueryError::PresenterNotFound { .. } => "presenter_not_found",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            QueryError::PresenterAccessDisabled => "presenter access disabled".to_string(),
            QueryError::InstanceAccessDisabled => "instance access disabled".to_string(),
            QueryError::PresenterNotFound { type_name, name } => {
                format!("not found: type={type_name} name={name}")
            }
        }
    }
}

/// # Errors produced by the registration pipeline.
///
/// Never returned to a `register`/`unregister` caller; routed to the handler
/// installed with [`Moviper::set_error_handler`](crate::Moviper::set_error_handler).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A presenter with the same type and name (or the very same presenter)
    /// is already registered while instance access is enabled.
    #[error("presenter {type_name} named {name:?} is already registered")]
    PresenterAlreadyRegistered {
        /// Rust type name of the rejected presenter.
        type_name: &'static str,
        /// Name of the rejected presenter.
        name: String,
    },

    /// Applying an event panicked; the router is restarted per its policy.
    #[error("router panicked: {reason}")]
    RouterPanicked {
        /// Panic payload rendered as text.
        reason: String,
    },

    /// The router exhausted its restart policy and stopped consuming events.
    #[error("router stopped after {restarts} restart(s)")]
    RouterStopped {
        /// Number of restarts performed before stopping.
        restarts: u32,
    },

    /// An event was submitted after the router stopped or the registry shut down.
    #[error("registration pipeline is closed")]
    PipelineClosed,
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use moviper::RegistryError;
    ///
    /// assert_eq!(RegistryError::PipelineClosed.as_label(), "pipeline_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::PresenterAlreadyRegistered { .. } => "presenter_already_registered",
            RegistryError::RouterPanicked { .. } => "router_panicked",
            RegistryError::RouterStopped { .. } => "router_stopped",
            RegistryError::PipelineClosed => "pipeline_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::PresenterAlreadyRegistered { type_name, name } => {
                format!("duplicate: type={type_name} name={name}")
            }
            RegistryError::RouterPanicked { reason } => format!("panic: {reason}"),
            RegistryError::RouterStopped { restarts } => {
                format!("stopped after {restarts} restarts")
            }
            RegistryError::PipelineClosed => "pipeline closed".to_string(),
        }
    }

    /// Indicates whether the pipeline keeps accepting events after this error.
    ///
    /// Returns `false` for [`RegistryError::RouterStopped`] and
    /// [`RegistryError::PipelineClosed`], `true` otherwise.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            RegistryError::RouterStopped { .. } | RegistryError::PipelineClosed
        )
    }
}

/// Renders a panic payload caught by `catch_unwind`.
pub(crate) fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
