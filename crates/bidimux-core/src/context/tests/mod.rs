use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::{Mutex, mpsc};

use bidimux_cdp::CdpSession;

use super::*;
use crate::event::{EventManager, SubscriptionManager};
use crate::protocol::browsing_context::ReadinessState;
use crate::protocol::message::OutgoingMessage;
use crate::queue::ProcessingQueue;
use crate::target::CdpTarget;
use crate::test_support::FakeBrowser;

struct Harness {
    browser: FakeBrowser,
    context: Arc<BrowsingContext>,
    sink: mpsc::UnboundedReceiver<OutgoingMessage>,
}

async fn harness(navigate_result: Value) -> Harness {
    let browser = FakeBrowser::start(Arc::new(move |method, _| {
        (method == "Page.navigate").then(|| navigate_result.clone())
    }));

    let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
    subscriptions
        .lock()
        .await
        .subscribe(&["browsingContext".to_string()], &[], &[], None)
        .unwrap();
    let (sink_tx, sink) = mpsc::unbounded_channel();
    let event_manager = EventManager::new(subscriptions, ProcessingQueue::new(sink_tx));

    let session = CdpSession::attached(browser.connection.clone(), "S1");
    let browser_session = CdpSession::browser(browser.connection.clone());
    let target = CdpTarget::new("T1", session, browser_session, false);
    target.initialize(false, Vec::new()).await;

    let context = BrowsingContext::new(
        "F1",
        None,
        "F1",
        "default",
        None,
        "about:blank",
        target,
        event_manager,
    );

    Harness {
        browser,
        context,
        sink,
    }
}

async fn next_method(sink: &mut mpsc::UnboundedReceiver<OutgoingMessage>) -> (String, Value) {
    let message = sink.recv().await.expect("an event");
    (
        message.body["method"].as_str().unwrap().to_string(),
        message.body["params"].clone(),
    )
}

#[tokio::test]
async fn navigate_complete_waits_for_load() {
    let mut h = harness(json!({"frameId": "F1", "loaderId": "L1"})).await;

    let context = h.context.clone();
    let navigate = tokio::spawn(async move {
        context
            .navigate("https://x/", ReadinessState::Complete)
            .await
    });

    h.browser.wait_for_command("Page.navigate").await.unwrap();
    h.context
        .on_frame_started_navigating("L1", "https://x/")
        .await;
    h.context.on_frame_navigated("L1", "https://x/").await;
    h.context.on_lifecycle_event("DOMContentLoaded", "L1").await;
    h.context.on_lifecycle_event("load", "L1").await;

    let result = navigate.await.unwrap().unwrap();
    let navigation = result.navigation.clone().unwrap();
    assert_eq!(result.url, "https://x/");

    let (method, params) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.navigationStarted");
    assert_eq!(params["navigation"], navigation.as_str());
    assert_eq!(params["context"], "F1");

    let (method, _) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.navigationCommitted");
    let (method, _) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.domContentLoaded");
    let (method, params) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.load");
    assert_eq!(params["navigation"], navigation.as_str());
}

#[tokio::test]
async fn fragment_navigation_completes_without_load() {
    let mut h = harness(json!({"frameId": "F1"})).await;
    h.context.on_frame_navigated("L0", "https://x/").await;
    // Drain the initial commit event.
    let (method, _) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.navigationCommitted");

    let context = h.context.clone();
    let navigate = tokio::spawn(async move {
        context
            .navigate("https://x/#a", ReadinessState::Complete)
            .await
    });

    h.browser.wait_for_command("Page.navigate").await.unwrap();
    h.context
        .on_navigated_within_document("https://x/#a", Some("fragment"))
        .await;

    let result = navigate.await.unwrap().unwrap();
    let navigation = result.navigation.unwrap();

    let (method, params) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.fragmentNavigated");
    assert_eq!(params["navigation"], navigation.as_str());
    assert_eq!(params["url"], "https://x/#a");

    // No load event follows a fragment navigation.
    assert!(h.sink.try_recv().is_err());
    assert_eq!(h.context.url().await, "https://x/#a");
}

#[tokio::test]
async fn second_navigate_aborts_the_first() {
    let mut h = harness(json!({"frameId": "F1", "loaderId": "LA"})).await;

    let context = h.context.clone();
    let first = tokio::spawn(async move {
        context.navigate("https://a/", ReadinessState::Complete).await
    });
    h.browser.wait_for_command("Page.navigate").await.unwrap();
    h.context.on_frame_started_navigating("LA", "https://a/").await;

    // Second command aborts the first attempt.
    let context = h.context.clone();
    let second = tokio::spawn(async move {
        context.navigate("https://b/", ReadinessState::None).await
    });
    let second_result = second.await.unwrap().unwrap();
    assert!(second_result.navigation.is_some());

    let first_err = first.await.unwrap().unwrap_err();
    assert!(first_err.message.contains("aborted"));

    let (method, _) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.navigationStarted");
    let (method, _) = next_method(&mut h.sink).await;
    assert_eq!(method, "browsingContext.navigationAborted");
}

#[tokio::test]
async fn navigate_error_text_fails_the_command() {
    let h = harness(json!({
        "frameId": "F1",
        "loaderId": "L1",
        "errorText": "net::ERR_NAME_NOT_RESOLVED"
    }))
    .await;

    let err = h
        .context
        .navigate("https://nope.invalid/", ReadinessState::None)
        .await
        .unwrap_err();
    assert!(err.message.contains("ERR_NAME_NOT_RESOLVED"));
}

#[tokio::test]
async fn disposal_cancels_lifecycle_waits() {
    let h = harness(json!({"frameId": "F1", "loaderId": "L1"})).await;

    let context = h.context.clone();
    let navigate = tokio::spawn(async move {
        context
            .navigate("https://slow/", ReadinessState::Complete)
            .await
    });
    h.browser.wait_for_command("Page.navigate").await.unwrap();

    h.context.dispose().await;
    let err = navigate.await.unwrap().unwrap_err();
    assert!(
        err.message.contains("canceled") || err.message.contains("aborted"),
        "unexpected message: {}",
        err.message
    );
}

#[tokio::test]
async fn default_realm_latch_waits_until_resolved() {
    let h = harness(json!({})).await;

    let context = h.context.clone();
    let waiter = tokio::spawn(async move { context.default_realm().await });
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    h.context.set_default_realm("realm-1").await;
    assert_eq!(waiter.await.unwrap(), "realm-1");
}
