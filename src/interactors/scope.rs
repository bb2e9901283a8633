//! # InteractorScope: cancelable background operations.
//!
//! Owns every operation an interactor started and releases them together on
//! detach. Each operation receives a child [`CancellationToken`]; operations
//! that ignore it are aborted anyway.
//!
//! ## Lifecycle
//! ```text
//! spawn(op) ──► child token ──► JoinSet ──► oneshot result ──► presenter
//!
//! detach(false) / clear() ──► cancel tokens ──► abort JoinSet ──► fresh scope
//! detach(true)            ──► keep running (retained instance)
//! drop                    ──► cancel + abort
//! ```

use std::future::Future;

use parking_lot::Mutex;
use tokio::{sync::oneshot, task::JoinSet};
use tokio_util::sync::CancellationToken;

struct Inner {
    token: CancellationToken,
    tasks: JoinSet<()>,
}

/// Scoped collection of cancelable background operations.
pub struct InteractorScope {
    inner: Mutex<Inner>,
}

impl InteractorScope {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                token: CancellationToken::new(),
                tasks: JoinSet::new(),
            }),
        }
    }

    /// Starts `op` on the current tokio runtime.
    ///
    /// The returned receiver yields the operation's output, or `RecvError`
    /// if the scope was cleared before it finished.
    pub fn spawn<F, Fut, T>(&self, op: F) -> oneshot::Receiver<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let token = self.inner.lock().token.child_token();
        let fut = op(token.clone());

        let mut inner = self.inner.lock();
        inner.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                out = fut => {
                    let _ = tx.send(out);
                }
            }
        });
        reap(&mut inner.tasks);
        rx
    }

    /// Number of operations still running.
    pub fn len(&self) -> usize {
        let mut inner = self.inner.lock();
        reap(&mut inner.tasks);
        inner.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancels and aborts every operation; the scope stays usable.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.token.cancel();
        inner.tasks.abort_all();
        inner.token = CancellationToken::new();
        inner.tasks = JoinSet::new();
    }

    /// Detach hook: releases operations unless the instance is retained.
    pub fn detach(&self, retain_instance: bool) {
        if !retain_instance {
            self.clear();
        }
    }
}

impl Default for InteractorScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InteractorScope {
    fn drop(&mut self) {
        self.inner.get_mut().token.cancel();
    }
}

/// Drops bookkeeping for operations that already finished.
fn reap(tasks: &mut JoinSet<()>) {
    while tasks.try_join_next().is_some() {}
}
