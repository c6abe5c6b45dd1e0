use serde_json::json;

use super::*;

#[test]
fn request_pattern_serializes() {
    let pattern = RequestPattern {
        url_pattern: Some("*".to_string()),
        resource_type: None,
        request_stage: Some(RequestStage::Response),
    };
    let json = serde_json::to_value(&pattern).unwrap();
    assert_eq!(json["urlPattern"], "*");
    assert_eq!(json["requestStage"], "Response");
    assert!(json.get("resourceType").is_none());
}

#[test]
fn request_paused_at_request_stage() {
    let event: RequestPausedEvent = serde_json::from_value(json!({
        "requestId": "interception-1",
        "request": {
            "url": "https://example.com/p",
            "method": "GET",
            "headers": {}
        },
        "frameId": "F1",
        "resourceType": "Document",
        "networkId": "R1"
    }))
    .unwrap();

    assert!(event.response_status_code.is_none());
    assert!(event.response_error_reason.is_none());
    assert_eq!(event.network_id.as_deref(), Some("R1"));
}

#[test]
fn request_paused_at_response_stage() {
    let event: RequestPausedEvent = serde_json::from_value(json!({
        "requestId": "interception-2",
        "request": {
            "url": "https://example.com/p",
            "method": "GET",
            "headers": {}
        },
        "frameId": "F1",
        "resourceType": "XHR",
        "responseStatusCode": 401,
        "responseStatusText": "Unauthorized",
        "responseHeaders": [{"name": "WWW-Authenticate", "value": "Basic"}]
    }))
    .unwrap();

    assert_eq!(event.response_status_code, Some(401));
    assert_eq!(event.response_headers.unwrap()[0].name, "WWW-Authenticate");
}

#[test]
fn auth_required_event_deserializes() {
    let event: AuthRequiredEvent = serde_json::from_value(json!({
        "requestId": "interception-3",
        "request": {"url": "https://example.com/", "method": "GET", "headers": {}},
        "frameId": "F1",
        "resourceType": "Document",
        "authChallenge": {
            "source": "Server",
            "origin": "https://example.com",
            "scheme": "basic",
            "realm": "secret"
        }
    }))
    .unwrap();

    assert_eq!(event.auth_challenge.scheme, "basic");
}

#[test]
fn continue_request_omits_unset_overrides() {
    let params = ContinueRequestParams {
        request_id: "interception-1".to_string(),
        ..Default::default()
    };
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json["requestId"], "interception-1");
    assert!(json.get("url").is_none());
    assert!(json.get("headers").is_none());
}
