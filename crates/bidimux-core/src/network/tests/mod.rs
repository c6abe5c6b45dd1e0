use serde_json::json;

use super::*;

fn request_will_be_sent(url: &str, redirect: Option<serde_json::Value>) -> RequestWillBeSentEvent {
    let mut event = json!({
        "requestId": "R1",
        "loaderId": "L1",
        "documentUrl": "https://example.com/",
        "request": {"url": url, "method": "GET", "headers": {"Accept": "*/*"}},
        "timestamp": 1.0,
        "wallTime": 1700000000.0,
        "initiator": {"type": "parser"},
        "type": "Document",
        "frameId": "F1"
    });
    if let Some(redirect) = redirect {
        event["redirectResponse"] = redirect;
        event["redirectHasExtraInfo"] = json!(false);
    }
    serde_json::from_value(event).unwrap()
}

fn extra_info() -> RequestWillBeSentExtraInfoEvent {
    serde_json::from_value(json!({
        "requestId": "R1",
        "headers": {"Accept": "*/*", "Cookie": "sid=1"}
    }))
    .unwrap()
}

fn response_received(has_extra_info: bool) -> ResponseReceivedEvent {
    serde_json::from_value(json!({
        "requestId": "R1",
        "loaderId": "L1",
        "timestamp": 2.0,
        "type": "Document",
        "response": {
            "url": "https://example.com/",
            "status": 200,
            "statusText": "OK",
            "headers": {"Content-Type": "text/html"},
            "mimeType": "text/html",
            "protocol": "h2",
            "encodedDataLength": 1234.0
        },
        "hasExtraInfo": has_extra_info
    }))
    .unwrap()
}

fn response_extra() -> ResponseReceivedExtraInfoEvent {
    serde_json::from_value(json!({
        "requestId": "R1",
        "headers": {"Content-Type": "text/html"},
        "statusCode": 200
    }))
    .unwrap()
}

fn methods(events: &[EventMessage]) -> Vec<&str> {
    events.iter().map(|e| e.method.as_str()).collect()
}

#[test]
fn before_request_sent_waits_for_extra_info() {
    let mut request = NetworkRequest::new("R1", Some("F1".to_string()), Some("S1".to_string()));

    let events = request.on_request_will_be_sent(request_will_be_sent("https://example.com/", None), None);
    assert!(events.is_empty(), "must wait for the extra-info join");

    let events = request.on_request_extra_info(extra_info());
    assert_eq!(methods(&events), vec!["network.beforeRequestSent"]);
    assert_eq!(request.before_request_sent.peek(), Some(Ok(())));

    let params = &events[0].params;
    assert_eq!(params["request"]["request"], "R1");
    assert_eq!(params["redirectCount"], 0);
    assert_eq!(params["isBlocked"], false);
    assert_eq!(params["context"], "F1");
}

#[test]
fn no_extra_info_response_unblocks_the_join() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/", None), None);

    // hasExtraInfo=false on the response says no extra infos will come.
    let events = request.on_response_received(response_received(false));
    assert_eq!(
        methods(&events),
        vec!["network.beforeRequestSent", "network.responseStarted"]
    );

    let events = request.on_loading_finished();
    assert_eq!(methods(&events), vec!["network.responseCompleted"]);
    assert_eq!(request.response_completed.peek(), Some(Ok(())));
}

#[test]
fn served_from_cache_skips_extra_info_and_drops_stale_ones() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/", None), None);

    let events = request.on_served_from_cache();
    assert_eq!(methods(&events), vec!["network.beforeRequestSent"]);

    // Extra info describing the original network fetch is dropped.
    assert!(request.on_response_extra_info(response_extra()).is_empty());

    let events = request.on_response_received(response_received(true));
    assert_eq!(methods(&events), vec!["network.responseStarted"]);
    let events = request.on_loading_finished();
    assert_eq!(methods(&events), vec!["network.responseCompleted"]);
    assert_eq!(events[0].params["response"]["fromCache"], true);
}

#[test]
fn full_exchange_emits_in_order() {
    let mut request = NetworkRequest::new("R1", Some("F1".to_string()), None);
    let mut all = Vec::new();
    all.extend(request.on_request_will_be_sent(
        request_will_be_sent("https://example.com/", None),
        Some("NAV".to_string()),
    ));
    all.extend(request.on_request_extra_info(extra_info()));
    all.extend(request.on_response_received(response_received(true)));
    all.extend(request.on_response_extra_info(response_extra()));
    all.extend(request.on_loading_finished());

    assert_eq!(
        methods(&all),
        vec![
            "network.beforeRequestSent",
            "network.responseStarted",
            "network.responseCompleted"
        ]
    );
    assert_eq!(all[0].params["navigation"], "NAV");
    assert_eq!(all[2].params["response"]["status"], 200);
}

#[test]
fn redirect_flushes_the_previous_leg() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/a", None), None);
    request.on_request_extra_info(extra_info());

    let redirect = json!({
        "url": "https://example.com/a",
        "status": 302,
        "statusText": "Found",
        "headers": {"Location": "/b"},
        "mimeType": ""
    });
    let events = request.on_request_will_be_sent(
        request_will_be_sent("https://example.com/b", Some(redirect)),
        None,
    );

    // The old leg closes fully before the new leg starts.
    assert_eq!(
        methods(&events),
        vec!["network.responseStarted", "network.responseCompleted"]
    );
    assert_eq!(events[1].params["redirectCount"], 0);
    assert_eq!(events[1].params["response"]["status"], 302);

    // The new leg proceeds independently with a bumped redirect count.
    let events = request.on_request_extra_info(extra_info());
    assert_eq!(methods(&events), vec!["network.beforeRequestSent"]);
    assert_eq!(events[0].params["redirectCount"], 1);
    assert_eq!(events[0].params["request"]["request"], "R1");
}

#[test]
fn loading_failed_emits_fetch_error() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://down.invalid/", None), None);

    let events = request.on_loading_failed("net::ERR_NAME_NOT_RESOLVED");
    assert_eq!(
        methods(&events),
        vec!["network.beforeRequestSent", "network.fetchError"]
    );
    assert_eq!(events[1].params["errorText"], "net::ERR_NAME_NOT_RESOLVED");
    assert!(matches!(request.response_completed.peek(), Some(Err(_))));
}

#[test]
fn request_stage_pause_blocks_before_request_sent() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/p", None), None);

    let paused: RequestPausedEvent = serde_json::from_value(json!({
        "requestId": "interception-1",
        "request": {"url": "https://example.com/p", "method": "GET", "headers": {}},
        "frameId": "F1",
        "resourceType": "Document",
        "networkId": "R1"
    }))
    .unwrap();

    let events = request.on_request_paused(&paused, vec!["icp-1".to_string()]);
    assert_eq!(methods(&events), vec!["network.beforeRequestSent"]);
    assert_eq!(events[0].params["isBlocked"], true);
    assert_eq!(events[0].params["intercepts"][0], "icp-1");
    assert_eq!(
        request.interception().unwrap().phase,
        InterceptPhase::BeforeRequestSent
    );
    assert_eq!(request.interception().unwrap().fetch_request_id, "interception-1");
}

#[test]
fn response_stage_pause_blocks_response_started() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/p", None), None);
    request.on_request_extra_info(extra_info());

    let paused: RequestPausedEvent = serde_json::from_value(json!({
        "requestId": "interception-2",
        "request": {"url": "https://example.com/p", "method": "GET", "headers": {}},
        "frameId": "F1",
        "resourceType": "Document",
        "networkId": "R1",
        "responseStatusCode": 200,
        "responseStatusText": "OK",
        "responseHeaders": [{"name": "Content-Type", "value": "text/html"}]
    }))
    .unwrap();

    let events = request.on_request_paused(&paused, vec!["icp-1".to_string()]);
    assert_eq!(methods(&events), vec!["network.responseStarted"]);
    assert_eq!(events[0].params["isBlocked"], true);
    assert_eq!(
        request.interception().unwrap().phase,
        InterceptPhase::ResponseStarted
    );

    // Continue clears the phase; completion reports unblocked.
    request.clear_interception();
    request.on_response_received(response_received(false));
    let events = request.on_loading_finished();
    assert_eq!(methods(&events), vec!["network.responseCompleted"]);
    assert_eq!(events[0].params["isBlocked"], false);
}

#[test]
fn unauthorized_pause_is_auth_phase() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/", None), None);

    let paused: RequestPausedEvent = serde_json::from_value(json!({
        "requestId": "interception-3",
        "request": {"url": "https://example.com/", "method": "GET", "headers": {}},
        "frameId": "F1",
        "resourceType": "Document",
        "responseStatusCode": 401,
        "responseStatusText": "Unauthorized"
    }))
    .unwrap();

    request.on_request_paused(&paused, Vec::new());
    assert_eq!(
        request.interception().unwrap().phase,
        InterceptPhase::AuthRequired
    );
}

#[test]
fn auth_required_event_carries_the_challenge() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.on_request_will_be_sent(request_will_be_sent("https://example.com/", None), None);

    let events = request.on_auth_required("interception-4", "basic", "secrets", vec![]);
    assert_eq!(
        methods(&events),
        vec!["network.beforeRequestSent", "network.authRequired"]
    );
    let auth = &events[1].params;
    assert_eq!(auth["response"]["status"], 401);
    assert_eq!(auth["response"]["authChallenges"][0]["scheme"], "basic");
    assert_eq!(auth["isBlocked"], true);
}

#[test]
fn dispose_fails_both_latches() {
    let mut request = NetworkRequest::new("R1", None, None);
    request.dispose();
    let Some(Err(message)) = request.before_request_sent.peek() else {
        panic!("expected error");
    };
    assert_eq!(message, "Network processor detached");
    assert!(matches!(request.response_completed.peek(), Some(Err(_))));
}
