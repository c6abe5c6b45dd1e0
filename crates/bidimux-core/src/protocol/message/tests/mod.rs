use serde_json::json;

use super::*;

#[test]
fn parses_a_well_formed_frame() {
    let frame = CommandFrame::parse(&json!({
        "id": 7,
        "method": "browsingContext.getTree",
        "params": {},
        "goog:channel": "tab-1"
    }))
    .unwrap();

    assert_eq!(frame.id, 7);
    assert_eq!(frame.method, "browsingContext.getTree");
    assert_eq!(frame.channel.as_deref(), Some("tab-1"));
}

#[test]
fn empty_channel_is_absent() {
    let frame = CommandFrame::parse(&json!({
        "id": 1,
        "method": "session.status",
        "params": {},
        "goog:channel": ""
    }))
    .unwrap();
    assert!(frame.channel.is_none());
}

#[test]
fn unprefixed_channel_member_is_ignored() {
    let frame = CommandFrame::parse(&json!({
        "id": 1,
        "method": "session.status",
        "params": {},
        "channel": "legacy"
    }))
    .unwrap();
    assert!(frame.channel.is_none());
}

#[test]
fn missing_params_fails_but_keeps_the_id() {
    let err = CommandFrame::parse(&json!({
        "id": 9,
        "method": "session.status"
    }))
    .unwrap_err();

    assert_eq!(err.id, Some(9));
    assert_eq!(err.error.code, crate::error::ErrorCode::InvalidArgument);
}

#[test]
fn negative_id_fails_without_an_id() {
    let err = CommandFrame::parse(&json!({
        "id": -3,
        "method": "session.status",
        "params": {}
    }))
    .unwrap_err();

    assert_eq!(err.id, None);
}

#[test]
fn non_object_frame_fails() {
    let err = CommandFrame::parse(&json!("not a frame")).unwrap_err();
    assert!(err.id.is_none());
}

#[test]
fn method_must_contain_a_module() {
    let err = CommandFrame::parse(&json!({
        "id": 2,
        "method": "status",
        "params": {}
    }))
    .unwrap_err();
    assert_eq!(err.id, Some(2));
}

#[test]
fn success_message_wire_shape() {
    let msg = OutgoingMessage::success(3, json!({"ok": true}), Some("ch".to_string()));
    let wire = msg.to_wire();
    assert_eq!(wire["type"], "success");
    assert_eq!(wire["id"], 3);
    assert_eq!(wire["result"]["ok"], true);
    assert_eq!(wire["goog:channel"], "ch");
}

#[test]
fn error_message_without_id() {
    let error = Error::new(ErrorCode::UnknownCommand, "nope");
    let msg = OutgoingMessage::error(None, &error, None);
    let wire = msg.to_wire();
    assert_eq!(wire["type"], "error");
    assert_eq!(wire["error"], "unknown command");
    assert!(wire.get("id").is_none());
    assert!(wire.get("goog:channel").is_none());
}

#[test]
fn event_message_wire_shape() {
    let event = EventMessage::new("browsingContext.load", json!({"context": "C1"}));
    let msg = OutgoingMessage::event(&event, None);
    let wire = msg.to_wire();
    assert_eq!(wire["type"], "event");
    assert_eq!(wire["method"], "browsingContext.load");
    assert_eq!(wire["params"]["context"], "C1");
}
