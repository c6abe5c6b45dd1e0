use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Mutex, mpsc};

use super::*;
use crate::event::subscription::{EventScope, SubscriptionManager};
use crate::protocol::message::{EventMessage, OutgoingMessage};
use crate::queue::ProcessingQueue;

async fn harness() -> (
    EventManager,
    Arc<Mutex<SubscriptionManager>>,
    mpsc::UnboundedReceiver<OutgoingMessage>,
) {
    let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
    let (sink_tx, sink_rx) = mpsc::unbounded_channel();
    let queue = ProcessingQueue::new(sink_tx);
    let manager = EventManager::new(subscriptions.clone(), queue);
    (manager, subscriptions, sink_rx)
}

#[tokio::test]
async fn event_reaches_each_matching_channel_once() {
    let (manager, subscriptions, mut sink) = harness().await;
    {
        let mut subs = subscriptions.lock().await;
        subs.subscribe(&["log".to_string()], &[], &[], None).unwrap();
        subs.subscribe(&["log".to_string()], &[], &[], Some("side".to_string()))
            .unwrap();
        subs.subscribe(&["log".to_string()], &[], &[], Some("side".to_string()))
            .unwrap();
    }

    manager
        .register_event(
            EventMessage::new("log.entryAdded", json!({"text": "hi"})),
            EventScope::global(),
        )
        .await;

    let first = sink.recv().await.unwrap();
    let second = sink.recv().await.unwrap();
    let channels: Vec<Option<String>> = vec![first.channel, second.channel];
    assert!(channels.contains(&None));
    assert!(channels.contains(&Some("side".to_string())));
    assert!(sink.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribed_event_is_dropped() {
    let (manager, _subscriptions, mut sink) = harness().await;

    manager
        .register_event(
            EventMessage::new("log.entryAdded", json!({})),
            EventScope::global(),
        )
        .await;

    assert!(!manager.has_listeners("log.entryAdded", &EventScope::global()).await);
    assert!(sink.try_recv().is_err());
}

#[tokio::test]
async fn promise_event_keeps_its_registration_slot() {
    let (manager, subscriptions, mut sink) = harness().await;
    subscriptions
        .lock()
        .await
        .subscribe(&["log".to_string()], &[], &[], None)
        .unwrap();

    let (release_tx, release_rx) = tokio::sync::watch::channel(false);

    // Register a slow event first, then a fast one; delivery order must
    // follow registration order.
    let mut slow_rx = release_rx.clone();
    manager
        .register_promise_event("log.entryAdded", EventScope::global(), async move {
            while !*slow_rx.borrow_and_update() {
                let _ = slow_rx.changed().await;
            }
            EventMessage::new("log.entryAdded", json!({"order": 1}))
        })
        .await;
    manager
        .register_event(
            EventMessage::new("log.entryAdded", json!({"order": 2})),
            EventScope::global(),
        )
        .await;

    release_tx.send(true).unwrap();
    assert_eq!(sink.recv().await.unwrap().body["params"]["order"], 1);
    assert_eq!(sink.recv().await.unwrap().body["params"]["order"], 2);
}
