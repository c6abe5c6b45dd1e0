use super::*;

#[test]
fn letters_resolve_with_code_and_text() {
    let data = resolve("a");
    assert_eq!(data.key, "a");
    assert_eq!(data.code.as_deref(), Some("KeyA"));
    assert_eq!(data.windows_virtual_key_code, 65);
    assert_eq!(data.text.as_deref(), Some("a"));
    assert!(data.modifier_bit.is_none());
}

#[test]
fn digits_resolve() {
    let data = resolve("7");
    assert_eq!(data.code.as_deref(), Some("Digit7"));
    assert_eq!(data.windows_virtual_key_code, 55);
}

#[test]
fn enter_produces_carriage_return_text() {
    let data = resolve("\u{E007}");
    assert_eq!(data.key, "Enter");
    assert_eq!(data.text.as_deref(), Some("\r"));
    assert_eq!(data.windows_virtual_key_code, 13);
}

#[test]
fn modifiers_carry_their_bits() {
    assert_eq!(resolve("\u{E008}").modifier_bit, Some(8)); // Shift
    assert_eq!(resolve("\u{E009}").modifier_bit, Some(2)); // Control
    assert_eq!(resolve("\u{E00A}").modifier_bit, Some(1)); // Alt
    assert_eq!(resolve("\u{E03D}").modifier_bit, Some(4)); // Meta
}

#[test]
fn right_hand_modifiers_share_bits() {
    let left = resolve("\u{E008}");
    let right = resolve("\u{E050}");
    assert_eq!(left.modifier_bit, right.modifier_bit);
    assert_eq!(right.code.as_deref(), Some("ShiftRight"));
}

#[test]
fn arrows_have_no_text() {
    let data = resolve("\u{E013}");
    assert_eq!(data.key, "ArrowUp");
    assert!(data.text.is_none());
}

#[test]
fn unknown_single_characters_pass_through() {
    let data = resolve("é");
    assert_eq!(data.key, "é");
    assert_eq!(data.text.as_deref(), Some("é"));
    assert!(data.code.is_none());
}
