use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Mutex, mpsc};

use bidimux_cdp::CdpSession;

use bidimux_cdp::protocol::fetch::RequestPattern;

use super::*;
use crate::event::{EventManager, SubscriptionManager};
use crate::queue::ProcessingQueue;
use crate::test_support::FakeBrowser;

fn target_on(browser: &FakeBrowser) -> Arc<CdpTarget> {
    let session = CdpSession::attached(browser.connection.clone(), "S1");
    let browser_session = CdpSession::browser(browser.connection.clone());
    CdpTarget::new("T1", session, browser_session, false)
}

#[tokio::test]
async fn init_sequence_enables_domains_and_unblocks() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    let installed = target.initialize(false, Vec::new()).await;
    assert!(installed.is_empty());
    target.wait_unblocked().await.unwrap();

    let methods = browser.methods();
    for expected in [
        "Runtime.enable",
        "Page.enable",
        "Page.setLifecycleEventsEnabled",
        "Security.setIgnoreCertificateErrors",
        "Target.setAutoAttach",
        "Runtime.runIfWaitingForDebugger",
    ] {
        assert!(methods.iter().any(|m| m == expected), "missing {expected}");
    }
    // Network module was not wanted.
    assert!(!methods.iter().any(|m| m == "Network.enable"));
    // The debugger release is the last init step.
    assert_eq!(methods.last().unwrap(), "Runtime.runIfWaitingForDebugger");
}

#[tokio::test]
async fn init_installs_preload_scripts_and_reports_cdp_ids() {
    let browser = FakeBrowser::start(Arc::new(|method, _| {
        (method == "Page.addScriptToEvaluateOnNewDocument")
            .then(|| json!({"identifier": "cdp-script-9"}))
    }));
    let target = target_on(&browser);

    let installed = target
        .initialize(
            true,
            vec![PreloadSpec {
                script_id: "ps-1".to_string(),
                source: "(() => {})()".to_string(),
                sandbox: None,
            }],
        )
        .await;

    assert_eq!(installed, vec![("ps-1".to_string(), "cdp-script-9".to_string())]);
    assert!(browser.methods().iter().any(|m| m == "Network.enable"));
    assert!(target.network_enabled());
}

#[tokio::test]
async fn target_closed_during_init_still_unblocks() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    // Closing the browser fails every init command with a target-closed
    // error; the latch must resolve with success anyway.
    browser.close();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    target.initialize(false, Vec::new()).await;
    target.wait_unblocked().await.unwrap();
}

#[tokio::test]
async fn network_toggle_is_idempotent() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    target.toggle_network_if_needed(true).await.unwrap();
    target.toggle_network_if_needed(true).await.unwrap();
    target.toggle_network_if_needed(false).await.unwrap();
    target.toggle_network_if_needed(false).await.unwrap();

    let methods: Vec<String> = browser
        .methods()
        .into_iter()
        .filter(|m| m.starts_with("Network."))
        .collect();
    assert_eq!(methods, vec!["Network.enable", "Network.disable"]);
}

#[tokio::test]
async fn fetch_apply_disables_before_enabling() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    let pattern = |url: &str| RequestPattern {
        url_pattern: Some(url.to_string()),
        resource_type: None,
        request_stage: None,
    };

    target.fetch_apply(vec![pattern("*")], false).await.unwrap();
    assert!(target.fetch_enabled().await);

    target
        .fetch_apply(vec![pattern("https://example.com/*")], true)
        .await
        .unwrap();

    let fetch_methods: Vec<String> = browser
        .methods()
        .into_iter()
        .filter(|m| m.starts_with("Fetch."))
        .collect();
    assert_eq!(
        fetch_methods,
        vec!["Fetch.enable", "Fetch.disable", "Fetch.enable"]
    );

    // Removing the last pattern leaves the domain disabled.
    target.fetch_apply(Vec::new(), false).await.unwrap();
    assert!(!target.fetch_enabled().await);
}

#[tokio::test]
async fn network_stays_enabled_while_fetch_is_active() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    let pattern = RequestPattern {
        url_pattern: Some("*".to_string()),
        resource_type: None,
        request_stage: None,
    };
    target.fetch_apply(vec![pattern], false).await.unwrap();
    assert!(target.network_enabled());

    target.toggle_network_if_needed(false).await.unwrap();
    // The disable was a no-op because fetch needs the domain.
    assert!(target.network_enabled());
}

#[tokio::test]
async fn cdp_event_bridge_publishes_wildcard_events() {
    let browser = FakeBrowser::ok();
    let target = target_on(&browser);

    let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
    subscriptions
        .lock()
        .await
        .subscribe(&["cdp".to_string()], &[], &[], None)
        .unwrap();
    let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
    let event_manager = EventManager::new(subscriptions, ProcessingQueue::new(sink_tx));

    target.start_cdp_event_bridge(event_manager);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    browser.emit_event("Page.somethingObscure", json!({"x": 1}), Some("S1"));

    let message = sink_rx.recv().await.unwrap();
    assert_eq!(message.body["method"], "cdp.Page.somethingObscure");
    assert_eq!(message.body["params"]["event"], "Page.somethingObscure");
    assert_eq!(message.body["params"]["params"]["x"], 1);
    assert_eq!(message.body["params"]["session"], "S1");

    // Events of other sessions are not bridged by this target.
    browser.emit_event("Page.other", json!({}), Some("S2"));
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert!(sink_rx.try_recv().is_err());
}
