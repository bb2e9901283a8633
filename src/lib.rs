//! # moviper
//!
//! **Moviper** is a presenter registry for VIPER-style (View-Interactor-Presenter)
//! applications. It lets otherwise-decoupled presenters find each other by type,
//! or by type and name, without holding direct references.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Presenter   │   │  Presenter   │   │  Presenter   │
//!     │ (attach/     │   │ (attach/     │   │ (queries its │
//!     │  detach)     │   │  detach)     │   │  peers)      │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!   register │ unregister       │                  │ presenters::<P>()
//!            ▼                  ▼                  │ presenter_instance::<P>(name)
//! ┌───────────────────────────────────────────┐    │
//! │  Moviper (handle, Arc-shared)             │    │
//! │  - Config gates (checked synchronously)   │◄───┘
//! │  - mpsc::unbounded (ordered submissions)  │
//! └──────┬────────────────────────────────────┘
//!        ▼
//! ┌───────────────────────────────────────────┐      ┌────────────────────┐
//! │  Router (single consumer, supervised)     │─────►│  Store             │
//! │  - duplicate detection                    │ write│  (copy-on-write,   │
//! │  - catch_unwind + RestartPolicy           │      │   Weak entries)    │
//! └──────┬───────────────┬────────────────────┘      └─────────▲──────────┘
//!        │               │ RegistryError                       │ snapshot
//!        │               ▼                                     │
//!        │        error handler (default: tracing::error!)     │
//!        ▼                                                     │
//! ┌───────────────────────────────────────────┐                │
//! │  Bus (broadcast) ─► Fanout (filtered)     │      PresenterStream<P>
//! └───────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Moviper::builder(RuntimeConfig) ──► build() ──► router spawned
//!
//! attach:   register(p)   ──► Register(p)   ──► [router] ──► Store + PresenterRegistered
//! detach:   unregister(p) ──► Unregister(p) ──► [router] ──► Store + PresenterUnregistered
//! duplicate (instance access on)            ──► [router] ──► PresenterRejected + handler
//!
//! shutdown() ──► cancel router ──► drain subscriber workers
//! ```
//!
//! ## Features
//! | Area              | Description                                                    | Key types / traits                          |
//! |-------------------|----------------------------------------------------------------|---------------------------------------------|
//! | **Registry**      | Ordered registration pipeline and type/name lookup.            | [`Moviper`], [`PresenterStream`]            |
//! | **Presenters**    | Registrable presenters, lifecycle hooks, composites.           | [`Presenter`], [`ViewPresenter`], [`PresenterList`] |
//! | **Interactors**   | Scoped, cancelable background operations.                      | [`InteractorScope`]                         |
//! | **Subscriber API**| Hook into registry events (logging, metrics, crash reporting). | [`Subscribe`], [`EventFilter`]              |
//! | **Policies**      | Router supervision after a panic.                              | [`RestartPolicy`]                           |
//! | **Errors**        | Typed errors for queries and the pipeline.                     | [`QueryError`], [`RegistryError`]           |
//! | **Configuration** | Access gates and pipeline settings.                            | [`Config`], [`RuntimeConfig`]               |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber, which forwards events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use moviper::{Config, Moviper, Presenter, QueryError, RuntimeConfig};
//!
//! struct Player(&'static str);
//! impl Presenter for Player {
//!     fn name(&self) -> &str { self.0 }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), QueryError> {
//!     let moviper = Moviper::builder(RuntimeConfig::default())
//!         .with_config(Config::enabled())
//!         .with_error_handler(|err| eprintln!("moviper: {err}"))
//!         .build();
//!
//!     let player = Arc::new(Player("main"));
//!     let registration = moviper.attach(&player);
//!     moviper.flush().await;
//!
//!     let found = moviper.presenter_instance_or_error::<Player>("main")?.await?;
//!     assert!(Arc::ptr_eq(&found, &player));
//!
//!     registration.detach();
//!     moviper.flush().await;
//!     assert!(moviper.presenter_instance::<Player>("main")?.await.is_none());
//!
//!     moviper.shutdown().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod interactors;
mod policies;
mod presenters;
mod subscribers;

// ---- Public re-exports ----

pub use self::core::{
    Config, ErrorHandler, Moviper, MoviperBuilder, PresenterStream, Registration, RuntimeConfig,
};
pub use error::{QueryError, RegistryError};
pub use events::{Event, EventKind};
pub use interactors::InteractorScope;
pub use policies::RestartPolicy;
pub use presenters::{Presenter, PresenterList, ViewPresenter, unique_name};
pub use subscribers::{EventFilter, Subscribe};

// Optional: expose a tracing-backed logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
