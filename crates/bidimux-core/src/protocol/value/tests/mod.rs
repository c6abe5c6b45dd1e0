use serde_json::json;

use super::*;

#[test]
fn primitive_local_values_deserialize() {
    let undefined: LocalValue = serde_json::from_value(json!({"type": "undefined"})).unwrap();
    assert!(matches!(undefined, LocalValue::Undefined));

    let string: LocalValue =
        serde_json::from_value(json!({"type": "string", "value": "hi"})).unwrap();
    assert!(matches!(string, LocalValue::String { value } if value == "hi"));

    let number: LocalValue =
        serde_json::from_value(json!({"type": "number", "value": 1.5})).unwrap();
    assert!(matches!(
        number,
        LocalValue::Number {
            value: JsNumber::Finite(v)
        } if (v - 1.5).abs() < f64::EPSILON
    ));
}

#[test]
fn special_numbers_deserialize() {
    for (wire, expected) in [
        ("NaN", SpecialNumber::NaN),
        ("-0", SpecialNumber::NegativeZero),
        ("Infinity", SpecialNumber::Infinity),
        ("-Infinity", SpecialNumber::NegativeInfinity),
    ] {
        let value: LocalValue =
            serde_json::from_value(json!({"type": "number", "value": wire})).unwrap();
        let LocalValue::Number {
            value: JsNumber::Special(special),
        } = value
        else {
            panic!("expected special number for {wire}");
        };
        assert_eq!(special, expected);
        assert_eq!(special.js_repr(), wire);
    }
}

#[test]
fn nested_containers_deserialize() {
    let value: LocalValue = serde_json::from_value(json!({
        "type": "map",
        "value": [
            ["plain", {"type": "number", "value": 1}],
            [{"type": "boolean", "value": true}, {"type": "null"}]
        ]
    }))
    .unwrap();

    let LocalValue::Map { value: entries } = value else {
        panic!("expected a map");
    };
    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0].0, EntryKey::String(ref key) if key == "plain"));
    assert!(matches!(entries[1].0, EntryKey::Value(LocalValue::Boolean { value: true })));
}

#[test]
fn remote_references_deserialize() {
    let by_handle: ArgumentValue =
        serde_json::from_value(json!({"handle": "h-1"})).unwrap();
    assert!(matches!(
        by_handle,
        ArgumentValue::Reference(RemoteReference::Object { ref handle }) if handle == "h-1"
    ));

    let by_shared: ArgumentValue =
        serde_json::from_value(json!({"sharedId": "nav_element_5", "handle": "h-2"})).unwrap();
    assert!(matches!(
        by_shared,
        ArgumentValue::Reference(RemoteReference::Shared { ref shared_id, .. })
            if shared_id == "nav_element_5"
    ));
}

#[test]
fn channel_argument_deserializes() {
    let value: ArgumentValue = serde_json::from_value(json!({
        "type": "channel",
        "value": {
            "channel": "my-channel",
            "serializationOptions": {"maxObjectDepth": 3},
            "ownership": "root"
        }
    }))
    .unwrap();

    let ArgumentValue::Local(LocalValue::Channel { value: props }) = value else {
        panic!("expected a channel");
    };
    assert_eq!(props.channel, "my-channel");
    assert_eq!(
        props.serialization_options.unwrap().max_object_depth,
        Some(3)
    );
    assert_eq!(props.ownership, Some(ResultOwnership::Root));
}

#[test]
fn target_variants_deserialize() {
    let context: Target =
        serde_json::from_value(json!({"context": "C1", "sandbox": "probe"})).unwrap();
    assert!(matches!(
        context,
        Target::Context { ref context, ref sandbox }
            if context == "C1" && sandbox.as_deref() == Some("probe")
    ));

    let realm: Target = serde_json::from_value(json!({"realm": "R1"})).unwrap();
    assert!(matches!(realm, Target::Realm { ref realm } if realm == "R1"));
}
