use serde_json::json;

use super::*;

#[test]
fn request_will_be_sent_with_redirect_response() {
    let event: RequestWillBeSentEvent = serde_json::from_value(json!({
        "requestId": "R1",
        "loaderId": "L1",
        "documentUrl": "https://example.com/",
        "request": {
            "url": "https://example.com/b",
            "method": "GET",
            "headers": {"Accept": "*/*"}
        },
        "timestamp": 1.0,
        "wallTime": 1700000000.0,
        "initiator": {"type": "other"},
        "redirectResponse": {
            "url": "https://example.com/a",
            "status": 302,
            "statusText": "Found",
            "headers": {"Location": "/b"},
            "mimeType": ""
        },
        "type": "Document",
        "frameId": "F1"
    }))
    .unwrap();

    assert_eq!(event.request_id, "R1");
    let redirect = event.redirect_response.unwrap();
    assert_eq!(redirect.status, 302);
    assert_eq!(event.resource_type, Some(ResourceType::Document));
}

#[test]
fn cookie_same_site_parses() {
    let cookie: Cookie = serde_json::from_value(json!({
        "name": "sid",
        "value": "abc",
        "domain": ".example.com",
        "path": "/",
        "expires": -1.0,
        "size": 6,
        "httpOnly": true,
        "secure": true,
        "session": true,
        "sameSite": "Lax"
    }))
    .unwrap();

    assert_eq!(cookie.same_site, Some(CookieSameSite::Lax));
    assert!(cookie.partition_key.is_none());
}

#[test]
fn cookie_partition_key_round_trips() {
    let key = CookiePartitionKey {
        top_level_site: "https://example.com".to_string(),
        has_cross_site_ancestor: false,
    };
    let json = serde_json::to_value(&key).unwrap();
    assert_eq!(json["topLevelSite"], "https://example.com");
    let back: CookiePartitionKey = serde_json::from_value(json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn response_received_has_extra_info_flag() {
    let event: ResponseReceivedEvent = serde_json::from_value(json!({
        "requestId": "R2",
        "loaderId": "L1",
        "timestamp": 2.0,
        "type": "XHR",
        "response": {
            "url": "https://example.com/api",
            "status": 200,
            "statusText": "OK",
            "headers": {},
            "mimeType": "application/json",
            "fromDiskCache": true
        },
        "hasExtraInfo": false
    }))
    .unwrap();

    assert!(!event.has_extra_info);
    assert_eq!(event.response.from_disk_cache, Some(true));
}

#[test]
fn cookie_param_serializes_minimal() {
    let param = CookieParam {
        name: "a".to_string(),
        value: "b".to_string(),
        domain: Some("example.com".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_value(&param).unwrap();
    assert_eq!(json["name"], "a");
    assert_eq!(json["domain"], "example.com");
    assert!(json.get("sameSite").is_none());
    assert!(json.get("expires").is_none());
}
