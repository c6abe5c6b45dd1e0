use serde_json::json;

use super::*;

#[test]
fn known_method_with_valid_params() {
    let command = Command::parse(
        "browsingContext.navigate",
        &json!({"context": "C1", "url": "https://example.com", "wait": "complete"}),
    )
    .unwrap();

    let Command::ContextNavigate(params) = command else {
        panic!("wrong variant");
    };
    assert_eq!(params.context, "C1");
    assert_eq!(
        params.wait,
        Some(crate::protocol::browsing_context::ReadinessState::Complete)
    );
}

#[test]
fn unknown_method_is_unknown_command() {
    let err = Command::parse("browsingContext.frobnicate", &json!({})).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownCommand);
}

#[test]
fn bad_params_is_invalid_argument() {
    let err = Command::parse("browsingContext.navigate", &json!({"url": 42})).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
}

#[test]
fn vendor_prefixed_cdp_methods_resolve() {
    let command = Command::parse(
        "goog:cdp.sendCommand",
        &json!({"method": "Browser.getVersion"}),
    )
    .unwrap();
    assert!(matches!(command, Command::CdpSendCommand(_)));
}

#[test]
fn empty_params_commands_accept_empty_objects() {
    assert!(matches!(
        Command::parse("session.status", &json!({})).unwrap(),
        Command::SessionStatus(_)
    ));
    assert!(matches!(
        Command::parse("browser.getUserContexts", &json!({})).unwrap(),
        Command::BrowserGetUserContexts(_)
    ));
}

#[test]
fn subscribe_params_parse() {
    let command = Command::parse(
        "session.subscribe",
        &json!({"events": ["network"], "contexts": ["C1"]}),
    )
    .unwrap();
    let Command::SessionSubscribe(params) = command else {
        panic!("wrong variant");
    };
    assert_eq!(params.events, vec!["network"]);
    assert_eq!(params.contexts.unwrap(), vec!["C1"]);
}
