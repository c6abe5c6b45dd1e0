//! Event manager: subscription-scoped delivery onto the ordered queue.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::trace;

use crate::protocol::message::{EventMessage, OutgoingMessage};
use crate::queue::ProcessingQueue;
use crate::wait::Deferred;

use super::subscription::{EventScope, SubscriptionManager};

/// Resolves event recipients and hands messages to the outgoing queue.
///
/// Recipients are resolved at registration time, so a subscription added
/// after an event was registered does not receive it, and ordering relative
/// to command responses is fixed at registration.
#[derive(Debug, Clone)]
pub struct EventManager {
    subscriptions: Arc<Mutex<SubscriptionManager>>,
    queue: ProcessingQueue<OutgoingMessage>,
}

impl EventManager {
    /// Create a manager over the shared subscription set and queue.
    pub fn new(
        subscriptions: Arc<Mutex<SubscriptionManager>>,
        queue: ProcessingQueue<OutgoingMessage>,
    ) -> Self {
        Self {
            subscriptions,
            queue,
        }
    }

    /// The shared subscription set.
    pub fn subscriptions(&self) -> &Arc<Mutex<SubscriptionManager>> {
        &self.subscriptions
    }

    /// Deliver a resolved event to every matching side-channel.
    pub async fn register_event(&self, event: EventMessage, scope: EventScope) {
        let channels = {
            let subscriptions = self.subscriptions.lock().await;
            subscriptions.channels_for(&event.method, &scope)
        };
        trace!(method = %event.method, recipients = channels.len(), "Event registered");
        for channel in channels {
            self.queue
                .enqueue_ready(OutgoingMessage::event(&event, channel));
        }
    }

    /// Reserve ordering slots for an event that is still being built.
    ///
    /// The queue position is taken now, one per matching side-channel; the
    /// payload future is awaited off-queue and its result fanned out when
    /// the slots drain.
    pub async fn register_promise_event<F>(
        &self,
        event_method: &str,
        scope: EventScope,
        payload: F,
    ) where
        F: Future<Output = EventMessage> + Send + 'static,
    {
        let channels = {
            let subscriptions = self.subscriptions.lock().await;
            subscriptions.channels_for(event_method, &scope)
        };
        trace!(method = %event_method, recipients = channels.len(), "Promise event registered");
        if channels.is_empty() {
            return;
        }

        let ready = Deferred::new();
        {
            let ready = ready.clone();
            tokio::spawn(async move {
                ready.resolve(payload.await);
            });
        }
        for channel in channels {
            let ready = ready.clone();
            self.queue.enqueue(async move {
                let event = ready.wait().await;
                OutgoingMessage::event(&event, channel)
            });
        }
    }

    /// Whether anything listens for `event` at `scope`.
    ///
    /// Lets producers skip building payloads nobody will receive.
    pub async fn has_listeners(&self, event: &str, scope: &EventScope) -> bool {
        self.subscriptions.lock().await.is_subscribed(event, scope)
    }
}

#[cfg(test)]
mod tests;
