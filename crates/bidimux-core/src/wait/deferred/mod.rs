//! Single-shot latches.
//!
//! A [`Deferred`] is a cell that starts pending and is resolved exactly
//! once; any number of tasks can await it, before or after resolution.
//! Cancellation is modelled by resolving with a terminal value, never by
//! dropping waiters.

use tokio::sync::watch;

/// A single-shot latch carrying a cloneable value.
///
/// The first [`Deferred::resolve`] wins; later resolutions are ignored and
/// reported as such. Waiting after resolution returns immediately.
#[derive(Debug, Clone)]
pub struct Deferred<T: Clone> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Deferred<T> {
    /// Create a pending latch.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Resolve the latch with `value`.
    ///
    /// Returns `true` if this call settled the latch, `false` if it was
    /// already settled.
    pub fn resolve(&self, value: T) -> bool {
        let mut settled_now = false;
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value.clone());
            settled_now = true;
            true
        });
        settled_now
    }

    /// Whether the latch has been resolved.
    pub fn is_settled(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The resolved value, if any.
    pub fn peek(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Wait for resolution and return a clone of the value.
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(value) = rx.borrow_and_update().clone() {
                return value;
            }
            // The sender lives in `self`, so `changed` cannot error here.
            if rx.changed().await.is_err() {
                unreachable!("deferred sender dropped while waiting on it");
            }
        }
    }
}

#[cfg(test)]
mod tests;
