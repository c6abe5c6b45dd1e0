use serde_json::json;

use bidimux_cdp::protocol::runtime::RemoteObject;

use super::*;

fn remote_object(deep: serde_json::Value) -> RemoteObject {
    serde_json::from_value(json!({
        "type": "object",
        "deepSerializedValue": deep,
    }))
    .unwrap()
}

#[test]
fn primitives_pass_through() {
    let value = serialize_remote_object(
        &remote_object(json!({"type": "string", "value": "hi"})),
        None,
    );
    assert_eq!(value, json!({"type": "string", "value": "hi"}));

    let value = serialize_remote_object(
        &remote_object(json!({"type": "number", "value": "NaN"})),
        None,
    );
    assert_eq!(value, json!({"type": "number", "value": "NaN"}));
}

#[test]
fn weak_reference_becomes_internal_id() {
    let value = serialize_remote_object(
        &remote_object(json!({"type": "object", "weakLocalObjectReference": 2})),
        None,
    );
    assert_eq!(value["internalId"], "2");
    assert!(value.get("weakLocalObjectReference").is_none());
}

#[test]
fn platform_object_collapses_to_object() {
    let value = serialize_remote_object(
        &remote_object(json!({"type": "platformobject", "value": {"ignored": true}})),
        None,
    );
    assert_eq!(value, json!({"type": "object"}));
}

#[test]
fn node_gets_shared_id_and_clean_payload() {
    let value = serialize_remote_object(
        &remote_object(json!({
            "type": "node",
            "value": {
                "nodeType": 1,
                "localName": "div",
                "namespaceURI": "",
                "backendNodeId": 42,
                "loaderId": "L1",
                "childNodeCount": 1,
                "children": [{
                    "type": "node",
                    "value": {"nodeType": 3, "backendNodeId": 43, "nodeValue": "text"}
                }],
                "shadowRoot": null
            }
        })),
        Some("FRAME"),
    );

    assert_eq!(value["type"], "node");
    assert_eq!(value["sharedId"], "FRAME_element_42");
    let node = &value["value"];
    assert!(node.get("backendNodeId").is_none());
    assert!(node.get("loaderId").is_none());
    assert_eq!(node["namespaceURI"], serde_json::Value::Null);
    assert_eq!(node["shadowRoot"], serde_json::Value::Null);

    let child = &node["children"][0];
    assert_eq!(child["sharedId"], "FRAME_element_43");
    assert!(child["value"].get("backendNodeId").is_none());
}

#[test]
fn containers_are_rewritten_recursively() {
    let value = serialize_remote_object(
        &remote_object(json!({
            "type": "array",
            "value": [
                {"type": "platformobject"},
                {"type": "number", "value": 1}
            ]
        })),
        None,
    );
    assert_eq!(value["value"][0], json!({"type": "object"}));
    assert_eq!(value["value"][1], json!({"type": "number", "value": 1}));
}

#[test]
fn map_entries_rewrite_keys_and_values() {
    let value = serialize_remote_object(
        &remote_object(json!({
            "type": "map",
            "value": [
                ["plain", {"type": "platformobject"}],
                [{"type": "number", "value": 1}, {"type": "string", "value": "v"}]
            ]
        })),
        None,
    );

    assert_eq!(value["value"][0][0], "plain");
    assert_eq!(value["value"][0][1], json!({"type": "object"}));
    assert_eq!(value["value"][1][0], json!({"type": "number", "value": 1}));
}

#[test]
fn generator_subtype_overrides_type() {
    let object: RemoteObject = serde_json::from_value(json!({
        "type": "object",
        "subtype": "generator",
        "objectId": "gen-1",
        "deepSerializedValue": {"type": "object", "value": []}
    }))
    .unwrap();

    let value = serialize_remote_object(&object, None);
    assert_eq!(value["type"], "generator");
    assert!(value.get("value").is_none());
}

#[test]
fn bare_primitive_without_deep_value() {
    let object: RemoteObject = serde_json::from_value(json!({
        "type": "boolean",
        "value": true
    }))
    .unwrap();
    assert_eq!(
        serialize_remote_object(&object, None),
        json!({"type": "boolean", "value": true})
    );

    let object: RemoteObject = serde_json::from_value(json!({"type": "undefined"})).unwrap();
    assert_eq!(
        serialize_remote_object(&object, None),
        json!({"type": "undefined"})
    );
}
