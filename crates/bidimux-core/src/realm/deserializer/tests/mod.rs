use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Mutex, mpsc};

use bidimux_cdp::CdpSession;

use super::*;
use crate::event::{EventScope, SubscriptionManager};
use crate::queue::ProcessingQueue;
use crate::realm::{Realm, RealmType};
use crate::test_support::FakeBrowser;

struct Fixture {
    browser: FakeBrowser,
    realm: Realm,
    event_manager: EventManager,
}

fn fixture_with(responder: Arc<crate::test_support::Responder>) -> Fixture {
    let browser = FakeBrowser::start(responder);
    let realm = Realm::new(
        RealmType::Window,
        Some("FRAME".to_string()),
        9,
        "https://example.com",
        None,
        CdpSession::attached(browser.connection.clone(), "S1"),
    );
    let (sink_tx, _sink) = mpsc::unbounded_channel();
    let event_manager = EventManager::new(
        Arc::new(Mutex::new(SubscriptionManager::new())),
        ProcessingQueue::new(sink_tx),
    );
    Fixture {
        browser,
        realm,
        event_manager,
    }
}

fn fixture() -> Fixture {
    fixture_with(Arc::new(|_, _| None))
}

impl Fixture {
    fn ctx(&self) -> DeserializationContext<'_> {
        DeserializationContext {
            realm: &self.realm,
            event_manager: &self.event_manager,
            event_scope: EventScope::global(),
        }
    }
}

async fn roundtrip(fixture: &Fixture, raw: serde_json::Value) -> CallArgument {
    let value: ArgumentValue = serde_json::from_value(raw).unwrap();
    deserialize_argument(&fixture.ctx(), &value).await.unwrap()
}

#[tokio::test]
async fn primitives_deserialize_directly() {
    let f = fixture();

    let arg = roundtrip(&f, json!({"type": "string", "value": "hi"})).await;
    assert_eq!(arg.value, Some(json!("hi")));

    let arg = roundtrip(&f, json!({"type": "boolean", "value": false})).await;
    assert_eq!(arg.value, Some(json!(false)));

    let arg = roundtrip(&f, json!({"type": "null"})).await;
    assert_eq!(arg.value, Some(serde_json::Value::Null));

    let arg = roundtrip(&f, json!({"type": "undefined"})).await;
    assert_eq!(arg.unserializable_value.as_deref(), Some("undefined"));
}

#[tokio::test]
async fn special_values_use_unserializable_spellings() {
    let f = fixture();

    let arg = roundtrip(&f, json!({"type": "number", "value": "NaN"})).await;
    assert_eq!(arg.unserializable_value.as_deref(), Some("NaN"));

    let arg = roundtrip(&f, json!({"type": "number", "value": "-0"})).await;
    assert_eq!(arg.unserializable_value.as_deref(), Some("-0"));

    let arg = roundtrip(&f, json!({"type": "bigint", "value": "12345"})).await;
    assert_eq!(arg.unserializable_value.as_deref(), Some("12345n"));

    let arg = roundtrip(
        &f,
        json!({"type": "date", "value": "2024-05-01T00:00:00.000Z"}),
    )
    .await;
    assert_eq!(
        arg.unserializable_value.as_deref(),
        Some("new Date(Date.parse(\"2024-05-01T00:00:00.000Z\"))")
    );

    let arg = roundtrip(
        &f,
        json!({"type": "regexp", "value": {"pattern": "a+b", "flags": "gi"}}),
    )
    .await;
    assert_eq!(
        arg.unserializable_value.as_deref(),
        Some("new RegExp(\"a+b\", \"gi\")")
    );
}

#[tokio::test]
async fn handles_pass_through_as_object_ids() {
    let f = fixture();
    let arg = roundtrip(&f, json!({"handle": "h-7"})).await;
    assert_eq!(arg.object_id.as_deref(), Some("h-7"));
}

#[tokio::test]
async fn shared_ids_resolve_through_dom() {
    let f = fixture_with(Arc::new(|method, _| {
        (method == "DOM.resolveNode")
            .then(|| json!({"object": {"type": "object", "objectId": "node-obj"}}))
    }));

    let arg = roundtrip(&f, json!({"sharedId": "FRAME_element_42"})).await;
    assert_eq!(arg.object_id.as_deref(), Some("node-obj"));

    let resolve = f.browser.wait_for_command("DOM.resolveNode").await.unwrap();
    assert_eq!(resolve.params["backendNodeId"], 42);
    assert_eq!(resolve.params["executionContextId"], 9);
}

#[tokio::test]
async fn mismatched_navigable_is_no_such_node() {
    let f = fixture();
    let value: ArgumentValue =
        serde_json::from_value(json!({"sharedId": "OTHER_element_42"})).unwrap();
    let err = deserialize_argument(&f.ctx(), &value).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoSuchNode);
}

#[tokio::test]
async fn arrays_are_rebuilt_in_the_realm() {
    let f = fixture_with(Arc::new(|method, params| {
        if method != "Runtime.callFunctionOn" {
            return None;
        }
        // The factory receives the flattened, deserialized elements.
        assert_eq!(params["arguments"][0]["value"], 1);
        assert_eq!(params["arguments"][1]["unserializableValue"], "NaN");
        Some(json!({"result": {"type": "object", "objectId": "arr-1"}}))
    }));

    let arg = roundtrip(
        &f,
        json!({
            "type": "array",
            "value": [
                {"type": "number", "value": 1},
                {"type": "number", "value": "NaN"}
            ]
        }),
    )
    .await;
    assert_eq!(arg.object_id.as_deref(), Some("arr-1"));
}

#[tokio::test]
async fn maps_flatten_keys_and_values() {
    let f = fixture_with(Arc::new(|method, params| {
        if method != "Runtime.callFunctionOn" {
            return None;
        }
        let args = params["arguments"].as_array().unwrap();
        assert_eq!(args.len(), 4);
        assert_eq!(args[0]["value"], "k");
        assert_eq!(args[1]["value"], 1);
        assert_eq!(args[2]["value"], true);
        assert_eq!(args[3]["value"], "v");
        Some(json!({"result": {"type": "object", "objectId": "map-1"}}))
    }));

    let arg = roundtrip(
        &f,
        json!({
            "type": "map",
            "value": [
                ["k", {"type": "number", "value": 1}],
                [{"type": "boolean", "value": true}, {"type": "string", "value": "v"}]
            ]
        }),
    )
    .await;
    assert_eq!(arg.object_id.as_deref(), Some("map-1"));
}

#[tokio::test]
async fn object_keys_must_be_strings() {
    let f = fixture();
    let value: ArgumentValue = serde_json::from_value(json!({
        "type": "object",
        "value": [
            [{"type": "boolean", "value": true}, {"type": "null"}]
        ]
    }))
    .unwrap();
    let err = deserialize_argument(&f.ctx(), &value).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
}
