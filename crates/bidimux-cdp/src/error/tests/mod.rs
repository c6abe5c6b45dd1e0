use super::*;

#[test]
fn connection_failed_display() {
    let err = CdpError::ConnectionFailed("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "WebSocket connection failed: connection refused"
    );
}

#[test]
fn connection_lost_display() {
    let err = CdpError::ConnectionLost;
    assert_eq!(err.to_string(), "WebSocket connection lost");
}

#[test]
fn protocol_error_display() {
    let err = CdpError::Protocol {
        code: -32601,
        message: "Method not found".to_string(),
    };
    assert_eq!(err.to_string(), "CDP protocol error -32601: Method not found");
}

#[test]
fn json_error_from_serde() {
    let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let err: CdpError = json_err.into();
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn connection_lost_is_target_closed() {
    assert!(CdpError::ConnectionLost.is_target_closed());
}

#[test]
fn session_not_found_code_is_target_closed() {
    let err = CdpError::Protocol {
        code: -32001,
        message: "Session with given id not found.".to_string(),
    };
    assert!(err.is_target_closed());
}

#[test]
fn close_messages_are_target_closed() {
    for message in [
        "Target closed",
        "Session closed",
        "Inspected target navigated or closed",
    ] {
        let err = CdpError::Protocol {
            code: -32000,
            message: message.to_string(),
        };
        assert!(err.is_target_closed(), "expected close error: {message}");
    }
}

#[test]
fn ordinary_protocol_error_is_not_target_closed() {
    let err = CdpError::Protocol {
        code: -32000,
        message: "Could not find object with given id".to_string(),
    };
    assert!(!err.is_target_closed());
    assert!(err.protocol_message_contains("Could not find object"));
    assert_eq!(err.protocol_code(), Some(-32000));
}
