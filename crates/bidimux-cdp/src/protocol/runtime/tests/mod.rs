use serde_json::json;

use super::*;

#[test]
fn remote_object_with_deep_serialized_value() {
    let object: RemoteObject = serde_json::from_value(json!({
        "type": "object",
        "className": "HTMLDivElement",
        "subtype": "node",
        "objectId": "obj-1",
        "deepSerializedValue": {
            "type": "node",
            "value": {"nodeType": 1, "backendNodeId": 42},
        }
    }))
    .unwrap();

    assert_eq!(object.object_type, "object");
    let deep = object.deep_serialized_value.unwrap();
    assert_eq!(deep.value_type, "node");
    assert_eq!(deep.value.unwrap()["backendNodeId"], 42);
}

#[test]
fn weak_local_object_reference_round_trips() {
    let deep: DeepSerializedValue = serde_json::from_value(json!({
        "type": "object",
        "weakLocalObjectReference": 3
    }))
    .unwrap();
    assert_eq!(deep.weak_local_object_reference, Some(3));

    let back = serde_json::to_value(&deep).unwrap();
    assert_eq!(back["weakLocalObjectReference"], 3);
}

#[test]
fn call_argument_constructors() {
    let value = CallArgument::from_value(json!([1, 2]));
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!({"value": [1, 2]})
    );

    let nan = CallArgument::unserializable("NaN");
    assert_eq!(
        serde_json::to_value(&nan).unwrap(),
        json!({"unserializableValue": "NaN"})
    );

    let handle = CallArgument::from_object_id("obj-7");
    assert_eq!(
        serde_json::to_value(&handle).unwrap(),
        json!({"objectId": "obj-7"})
    );
}

#[test]
fn serialization_options_serialize() {
    let options = SerializationOptions {
        serialization: SerializationMode::Deep,
        max_depth: Some(2),
        additional_parameters: Some(json!({"maxNodeDepth": 0, "includeShadowTree": "none"})),
    };
    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json["serialization"], "deep");
    assert_eq!(json["maxDepth"], 2);
    assert_eq!(json["additionalParameters"]["includeShadowTree"], "none");
}

#[test]
fn execution_context_created_event() {
    let event: ExecutionContextCreatedEvent = serde_json::from_value(json!({
        "context": {
            "id": 5,
            "origin": "https://example.com",
            "name": "",
            "uniqueId": "u-5",
            "auxData": {"frameId": "F1", "isDefault": true, "type": "default"}
        }
    }))
    .unwrap();

    assert_eq!(event.context.id, 5);
    let aux = event.context.aux_data.unwrap();
    assert_eq!(aux.frame_id.as_deref(), Some("F1"));
    assert_eq!(aux.is_default, Some(true));
}

#[test]
fn exception_details_deserialize() {
    let details: ExceptionDetails = serde_json::from_value(json!({
        "exceptionId": 1,
        "text": "Uncaught",
        "lineNumber": 3,
        "columnNumber": 10,
        "exception": {"type": "object", "subtype": "error", "description": "Error: boom"},
        "stackTrace": {"callFrames": [{
            "functionName": "fail",
            "scriptId": "s1",
            "url": "https://example.com/app.js",
            "lineNumber": 3,
            "columnNumber": 10
        }]}
    }))
    .unwrap();

    assert_eq!(details.text, "Uncaught");
    assert_eq!(details.stack_trace.unwrap().call_frames.len(), 1);
}
