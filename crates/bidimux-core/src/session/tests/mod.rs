use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::*;
use crate::test_support::FakeBrowser;

struct Harness {
    browser: FakeBrowser,
    session: BidiSession,
    sink: mpsc::UnboundedReceiver<OutgoingMessage>,
}

fn harness_with(responder: Arc<crate::test_support::Responder>) -> Harness {
    let browser = FakeBrowser::start(responder);
    let (sink_tx, sink) = mpsc::unbounded_channel();
    let session = BidiSession::new(browser.connection.clone(), sink_tx);
    Harness {
        browser,
        session,
        sink,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(|_, _| None))
}

impl Harness {
    async fn command(&mut self, id: u64, method: &str, params: Value) -> Value {
        self.session
            .process_command(&json!({"id": id, "method": method, "params": params}))
            .await;
        loop {
            let message = self.sink.recv().await.expect("a response");
            let wire = message.to_wire();
            if wire["id"] == json!(id) {
                return wire;
            }
        }
    }

    /// Attach a page target and wait for its context to register.
    async fn attach_page(&mut self, target_id: &str, session_id: &str) {
        self.browser.emit_event(
            "Target.attachedToTarget",
            json!({
                "sessionId": session_id,
                "targetInfo": {
                    "targetId": target_id,
                    "type": "page",
                    "title": "",
                    "url": "about:blank",
                    "attached": true
                },
                "waitingForDebugger": true
            }),
            None,
        );
        for _ in 0..400 {
            if self.session.contexts().has_context(target_id).await {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        panic!("context never attached");
    }
}

#[tokio::test]
async fn status_reports_not_ready() {
    let mut h = harness();
    let response = h.command(1, "session.status", json!({})).await;
    assert_eq!(response["type"], "success");
    assert_eq!(response["result"]["ready"], false);
    assert_eq!(response["result"]["message"], "already connected");
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let mut h = harness();
    let response = h.command(2, "brewing.coffee", json!({})).await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["error"], "unknown command");
    assert_eq!(response["id"], 2);
}

#[tokio::test]
async fn malformed_frame_keeps_the_id_when_parseable() {
    let mut h = harness();
    h.session
        .process_command(&json!({"id": 9, "method": "session.status"}))
        .await;
    let wire = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(wire["type"], "error");
    assert_eq!(wire["error"], "invalid argument");
    assert_eq!(wire["id"], 9);
}

#[tokio::test]
async fn channel_tag_round_trips_on_responses() {
    let mut h = harness();
    h.session
        .process_command(&json!({
            "id": 4,
            "method": "session.status",
            "params": {},
            "goog:channel": "side"
        }))
        .await;
    let wire = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(wire["id"], 4);
    assert_eq!(wire["goog:channel"], "side");
}

#[tokio::test]
async fn start_enables_auto_attach() {
    let h = harness();
    h.session.start().await.unwrap();
    let command = h.browser.wait_for_command("Target.setAutoAttach").await.unwrap();
    assert_eq!(command.params["autoAttach"], true);
    assert_eq!(command.params["waitForDebuggerOnStart"], true);
    assert_eq!(command.params["flatten"], true);
}

#[tokio::test]
async fn attached_target_becomes_a_context_with_created_event() {
    let mut h = harness();
    let subscribe = h
        .command(1, "session.subscribe", json!({"events": ["browsingContext"]}))
        .await;
    assert_eq!(subscribe["type"], "success");

    h.attach_page("PAGE1", "S1").await;

    // The init sequence ran against the new session.
    let run = h
        .browser
        .wait_for_command("Runtime.runIfWaitingForDebugger")
        .await
        .unwrap();
    assert_eq!(run.session_id.as_deref(), Some("S1"));

    // contextCreated surfaced after the unblock.
    let event = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(event["type"], "event");
    assert_eq!(event["method"], "browsingContext.contextCreated");
    assert_eq!(event["params"]["context"], "PAGE1");
    assert_eq!(event["params"]["userContext"], "default");

    let tree = h.command(2, "browsingContext.getTree", json!({})).await;
    assert_eq!(tree["result"]["contexts"][0]["context"], "PAGE1");
}

#[tokio::test]
async fn execution_context_creates_a_realm() {
    let mut h = harness();
    h.command(1, "session.subscribe", json!({"events": ["script"]}))
        .await;
    h.attach_page("PAGE1", "S1").await;

    h.browser.emit_event(
        "Runtime.executionContextCreated",
        json!({
            "context": {
                "id": 3,
                "origin": "https://example.com",
                "name": "",
                "auxData": {"frameId": "PAGE1", "isDefault": true, "type": "default"}
            }
        }),
        Some("S1"),
    );

    let event = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(event["method"], "script.realmCreated");
    assert_eq!(event["params"]["context"], "PAGE1");
    assert_eq!(event["params"]["type"], "window");
    let realm_id = event["params"]["realm"].as_str().unwrap().to_string();

    // The realm resolves through the cdp escape hatch.
    let resolved = h
        .command(2, "cdp.resolveRealm", json!({"realm": realm_id}))
        .await;
    assert_eq!(resolved["result"]["executionContextId"], 3);

    let session_lookup = h
        .command(3, "cdp.getSession", json!({"context": "PAGE1"}))
        .await;
    assert_eq!(session_lookup["result"]["session"], "S1");
}

#[tokio::test]
async fn navigate_on_unknown_context_is_no_such_frame() {
    let mut h = harness();
    let response = h
        .command(
            5,
            "browsingContext.navigate",
            json!({"context": "missing", "url": "https://x/"}),
        )
        .await;
    assert_eq!(response["type"], "error");
    assert_eq!(response["error"], "no such frame");
}

#[tokio::test]
async fn user_context_round_trip() {
    let mut h = harness_with(Arc::new(|method, _| {
        (method == "Target.createBrowserContext")
            .then(|| json!({"browserContextId": "BC7"}))
    }));

    let created = h
        .command(1, "browser.createUserContext", json!({}))
        .await;
    assert_eq!(created["result"]["userContext"], "BC7");

    let listed = h.command(2, "browser.getUserContexts", json!({})).await;
    let contexts = listed["result"]["userContexts"].as_array().unwrap();
    assert_eq!(contexts.len(), 2);
    assert_eq!(contexts[0]["userContext"], "default");
    assert_eq!(contexts[1]["userContext"], "BC7");

    let removed = h
        .command(3, "browser.removeUserContext", json!({"userContext": "BC7"}))
        .await;
    assert_eq!(removed["type"], "success");

    let default_removal = h
        .command(4, "browser.removeUserContext", json!({"userContext": "default"}))
        .await;
    assert_eq!(default_removal["error"], "invalid argument");
}

#[tokio::test]
async fn detach_destroys_contexts_and_requests() {
    let mut h = harness();
    h.command(1, "session.subscribe", json!({"events": ["browsingContext"]}))
        .await;
    h.attach_page("PAGE1", "S1").await;
    let created = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(created["method"], "browsingContext.contextCreated");

    h.browser.emit_event(
        "Target.detachedFromTarget",
        json!({"sessionId": "S1", "targetId": "PAGE1"}),
        None,
    );

    let destroyed = h.sink.recv().await.unwrap().to_wire();
    assert_eq!(destroyed["method"], "browsingContext.contextDestroyed");
    assert_eq!(destroyed["params"]["context"], "PAGE1");

    for _ in 0..200 {
        if !h.session.contexts().has_context("PAGE1").await {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    panic!("context survived the detach");
}
