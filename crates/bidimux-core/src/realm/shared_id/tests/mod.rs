use super::*;

#[test]
fn round_trip() {
    let formatted = SharedId::format("FRAME", 42);
    assert_eq!(formatted, "FRAME_element_42");
    let parsed = SharedId::parse(&formatted).unwrap();
    assert_eq!(parsed.navigable_id, "FRAME");
    assert_eq!(parsed.backend_node_id, 42);
}

#[test]
fn malformed_ids_are_no_such_node() {
    for bad in ["", "FRAME", "FRAME_element_", "FRAME_element_x", "_element_5"] {
        let err = SharedId::parse(bad).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NoSuchNode, "{bad}");
    }
}

#[test]
fn navigable_ids_with_underscores_parse() {
    let parsed = SharedId::parse("frame_a_element_7").unwrap();
    assert_eq!(parsed.navigable_id, "frame_a");
    assert_eq!(parsed.backend_node_id, 7);
}
