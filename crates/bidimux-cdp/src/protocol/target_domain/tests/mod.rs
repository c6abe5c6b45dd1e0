use serde_json::json;

use super::*;

#[test]
fn target_info_deserializes() {
    let info: TargetInfo = serde_json::from_value(json!({
        "targetId": "T1",
        "type": "page",
        "title": "Example",
        "url": "https://example.com/",
        "attached": true,
        "browserContextId": "BC1"
    }))
    .unwrap();

    assert_eq!(info.target_id, "T1");
    assert_eq!(info.target_type, "page");
    assert_eq!(info.browser_context_id.as_deref(), Some("BC1"));
    assert!(info.opener_id.is_none());
}

#[test]
fn attached_to_target_event_deserializes() {
    let event: AttachedToTargetEvent = serde_json::from_value(json!({
        "sessionId": "S1",
        "targetInfo": {
            "targetId": "T1",
            "type": "iframe",
            "title": "",
            "url": "about:blank",
            "attached": true
        },
        "waitingForDebugger": true
    }))
    .unwrap();

    assert_eq!(event.session_id, "S1");
    assert_eq!(event.target_info.target_type, "iframe");
    assert!(event.waiting_for_debugger);
}

#[test]
fn set_auto_attach_serializes_camel_case() {
    let params = SetAutoAttachParams {
        auto_attach: true,
        wait_for_debugger_on_start: true,
        flatten: Some(true),
    };
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json["autoAttach"], true);
    assert_eq!(json["waitForDebuggerOnStart"], true);
    assert_eq!(json["flatten"], true);
}

#[test]
fn create_target_omits_empty_options() {
    let params = CreateTargetParams {
        url: "about:blank".to_string(),
        ..Default::default()
    };
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json["url"], "about:blank");
    assert!(json.get("browserContextId").is_none());
    assert!(json.get("newWindow").is_none());
}
