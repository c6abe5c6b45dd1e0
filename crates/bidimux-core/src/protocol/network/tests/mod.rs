use serde_json::json;

use super::*;

#[test]
fn url_pattern_variants_deserialize() {
    let pattern: UrlPattern = serde_json::from_value(json!({
        "type": "pattern",
        "pathname": "/p",
        "hostname": "example.com"
    }))
    .unwrap();
    let UrlPattern::Pattern {
        pathname, hostname, ..
    } = pattern
    else {
        panic!("expected a structured pattern");
    };
    assert_eq!(pathname.as_deref(), Some("/p"));
    assert_eq!(hostname.as_deref(), Some("example.com"));

    let string: UrlPattern = serde_json::from_value(json!({
        "type": "string",
        "pattern": "https://example.com/*"
    }))
    .unwrap();
    assert!(matches!(string, UrlPattern::String { .. }));
}

#[test]
fn intercept_phases_deserialize_camel_case() {
    let params: AddInterceptParams = serde_json::from_value(json!({
        "phases": ["beforeRequestSent", "responseStarted", "authRequired"]
    }))
    .unwrap();
    assert_eq!(
        params.phases,
        vec![
            InterceptPhase::BeforeRequestSent,
            InterceptPhase::ResponseStarted,
            InterceptPhase::AuthRequired
        ]
    );
}

#[test]
fn bytes_value_variants() {
    let text: BytesValue =
        serde_json::from_value(json!({"type": "string", "value": "hello"})).unwrap();
    assert_eq!(text.byte_len(), 5);

    let bytes: BytesValue =
        serde_json::from_value(json!({"type": "base64", "value": "aGVsbG8="})).unwrap();
    assert_eq!(bytes.byte_len(), 6);
}

#[test]
fn base_parameters_flatten_into_events() {
    let event = BeforeRequestSent {
        base: BaseParameters {
            context: Some("C1".to_string()),
            is_blocked: false,
            navigation: None,
            redirect_count: 0,
            request: RequestData {
                request: "R1".to_string(),
                url: "https://example.com/".to_string(),
                method: "GET".to_string(),
                headers: vec![],
                cookies: vec![],
                headers_size: 0,
                body_size: None,
                timings: FetchTimingInfo::default(),
            },
            timestamp: 1_700_000_000_000,
            intercepts: None,
        },
        initiator: Initiator::default(),
    };

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["context"], "C1");
    assert_eq!(json["isBlocked"], false);
    assert_eq!(json["request"]["request"], "R1");
    assert!(json.get("intercepts").is_none());
    assert!(json.get("initiator").is_some());
}

#[test]
fn continue_with_auth_actions_deserialize() {
    let params: ContinueWithAuthParams = serde_json::from_value(json!({
        "request": "R1",
        "action": "provideCredentials",
        "credentials": {"type": "password", "username": "u", "password": "p"}
    }))
    .unwrap();
    assert_eq!(params.action, ContinueWithAuthAction::ProvideCredentials);
    assert_eq!(params.credentials.unwrap().username, "u");
}

#[test]
fn same_site_wire_spelling_is_lowercase() {
    assert_eq!(serde_json::to_value(SameSite::Strict).unwrap(), "strict");
    assert_eq!(serde_json::to_value(SameSite::Lax).unwrap(), "lax");
    assert_eq!(serde_json::to_value(SameSite::None).unwrap(), "none");
}
