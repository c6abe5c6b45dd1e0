use super::*;

#[test]
fn error_codes_spell_like_the_spec() {
    assert_eq!(ErrorCode::InvalidArgument.as_str(), "invalid argument");
    assert_eq!(ErrorCode::NoSuchHandle.as_str(), "no such handle");
    assert_eq!(ErrorCode::NoSuchHistoryEntry.as_str(), "no such history entry");
    assert_eq!(
        ErrorCode::UnableToCaptureScreen.as_str(),
        "unable to capture screen"
    );
    assert_eq!(ErrorCode::UnknownCommand.as_str(), "unknown command");
}

#[test]
fn unknown_error_carries_a_stacktrace() {
    let error = Error::unknown("boom");
    assert_eq!(error.code, ErrorCode::UnknownError);
    assert_eq!(error.stacktrace.as_deref(), Some("boom"));
}

#[test]
fn display_joins_code_and_message() {
    let error = Error::new(ErrorCode::NoSuchFrame, "context C1 not found");
    assert_eq!(error.to_string(), "no such frame: context C1 not found");
}

#[test]
fn cdp_error_falls_back_to_unknown_error() {
    let cdp = bidimux_cdp::CdpError::Protocol {
        code: -32000,
        message: "something odd".to_string(),
    };
    let error: Error = cdp.into();
    assert_eq!(error.code, ErrorCode::UnknownError);
    assert!(error.message.contains("something odd"));
}
