//! Ordered outgoing queue.
//!
//! BiDi requires responses on one connection to be emitted in command
//! submission order, and events to keep their registration order relative
//! to other outgoing traffic. The queue accepts futures at registration
//! time and forwards their resolved values strictly in submission order,
//! so slow commands hold back later traffic instead of being overtaken.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::{debug, trace};

type QueuedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A FIFO of pending items, drained to a sink in submission order.
///
/// Each enqueued future is awaited to completion before the next one is
/// looked at; the resolved value is forwarded to the sink. Dropping the
/// queue lets the drain task finish whatever was already enqueued and then
/// stop.
#[derive(Debug)]
pub struct ProcessingQueue<T> {
    tx: mpsc::UnboundedSender<QueuedFuture<T>>,
}

impl<T: Send + 'static> ProcessingQueue<T> {
    /// Create a queue draining into `sink`.
    pub fn new(sink: mpsc::UnboundedSender<T>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<QueuedFuture<T>>();

        tokio::spawn(async move {
            debug!("Processing queue started");
            while let Some(future) = rx.recv().await {
                let item = future.await;
                if sink.send(item).is_err() {
                    debug!("Outgoing sink closed, stopping processing queue");
                    break;
                }
                trace!("Processing queue forwarded one item");
            }
            debug!("Processing queue drained");
        });

        Self { tx }
    }

    /// Enqueue a future; its output is forwarded once every earlier entry
    /// has been forwarded.
    pub fn enqueue<F>(&self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        // A closed receiver means the session is shutting down; the item
        // can only be dropped at that point.
        let _ = self.tx.send(Box::pin(future));
    }

    /// Enqueue an already-resolved item.
    pub fn enqueue_ready(&self, item: T)
    where
        T: 'static,
    {
        self.enqueue(std::future::ready(item));
    }
}

impl<T> Clone for ProcessingQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
