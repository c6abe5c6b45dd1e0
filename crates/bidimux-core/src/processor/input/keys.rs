//! Key value resolution for keyboard actions.
//!
//! BiDi key actions carry either a single code point or one of the
//! WebDriver normalised key code points from the private-use area. Both
//! resolve to the DOM `key`, `code` and Windows virtual key code that
//! trusted CDP key events need.

/// Resolved key data for one key action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyData {
    /// DOM `key` value.
    pub key: String,
    /// DOM `code` value, when the physical key is known.
    pub code: Option<String>,
    /// Windows virtual key code.
    pub windows_virtual_key_code: i64,
    /// Text the key produces, for character keys.
    pub text: Option<String>,
    /// Modifier bit if this is a modifier key (Alt=1, Ctrl=2, Meta=4,
    /// Shift=8).
    pub modifier_bit: Option<u32>,
}

/// Resolve a raw key action value.
pub fn resolve(value: &str) -> KeyData {
    let mut chars = value.chars();
    let (first, rest) = (chars.next(), chars.next());
    if let (Some(ch), None) = (first, rest) {
        if let Some(normalised) = normalised_key(ch) {
            return normalised;
        }
        return character_key(ch);
    }
    // Multi-character values are passed through as named keys.
    KeyData {
        key: value.to_string(),
        code: None,
        windows_virtual_key_code: 0,
        text: None,
        modifier_bit: None,
    }
}

/// A printable character key.
fn character_key(ch: char) -> KeyData {
    let upper = ch.to_ascii_uppercase();
    let (code, vk) = match ch {
        'a'..='z' | 'A'..='Z' => (Some(format!("Key{upper}")), upper as i64),
        '0'..='9' => (Some(format!("Digit{ch}")), ch as i64),
        ' ' => (Some("Space".to_string()), 32),
        _ => (None, 0),
    };
    KeyData {
        key: ch.to_string(),
        code,
        windows_virtual_key_code: vk,
        text: Some(ch.to_string()),
        modifier_bit: None,
    }
}

fn named(key: &str, code: Option<&str>, vk: i64) -> Option<KeyData> {
    Some(KeyData {
        key: key.to_string(),
        code: code.map(str::to_string),
        windows_virtual_key_code: vk,
        text: None,
        modifier_bit: None,
    })
}

fn modifier(key: &str, code: &str, vk: i64, bit: u32) -> Option<KeyData> {
    Some(KeyData {
        key: key.to_string(),
        code: Some(code.to_string()),
        windows_virtual_key_code: vk,
        text: None,
        modifier_bit: Some(bit),
    })
}

/// The WebDriver normalised key table (the subset Chromium distinguishes).
fn normalised_key(ch: char) -> Option<KeyData> {
    match ch {
        '\u{E000}' => named("Unidentified", None, 0),
        '\u{E001}' => named("Cancel", None, 3),
        '\u{E002}' => named("Help", Some("Help"), 47),
        '\u{E003}' => named("Backspace", Some("Backspace"), 8),
        '\u{E004}' => named("Tab", Some("Tab"), 9),
        '\u{E005}' => named("Clear", None, 12),
        '\u{E006}' => KeyData {
            key: "Enter".to_string(),
            code: Some("Enter".to_string()),
            windows_virtual_key_code: 13,
            text: Some("\r".to_string()),
            modifier_bit: None,
        }
        .into(),
        '\u{E007}' => KeyData {
            key: "Enter".to_string(),
            code: Some("NumpadEnter".to_string()),
            windows_virtual_key_code: 13,
            text: Some("\r".to_string()),
            modifier_bit: None,
        }
        .into(),
        '\u{E008}' => modifier("Shift", "ShiftLeft", 16, 8),
        '\u{E009}' => modifier("Control", "ControlLeft", 17, 2),
        '\u{E00A}' => modifier("Alt", "AltLeft", 18, 1),
        '\u{E00B}' => named("Pause", Some("Pause"), 19),
        '\u{E00C}' => named("Escape", Some("Escape"), 27),
        '\u{E00D}' => KeyData {
            key: " ".to_string(),
            code: Some("Space".to_string()),
            windows_virtual_key_code: 32,
            text: Some(" ".to_string()),
            modifier_bit: None,
        }
        .into(),
        '\u{E00E}' => named("PageUp", Some("PageUp"), 33),
        '\u{E00F}' => named("PageDown", Some("PageDown"), 34),
        '\u{E010}' => named("End", Some("End"), 35),
        '\u{E011}' => named("Home", Some("Home"), 36),
        '\u{E012}' => named("ArrowLeft", Some("ArrowLeft"), 37),
        '\u{E013}' => named("ArrowUp", Some("ArrowUp"), 38),
        '\u{E014}' => named("ArrowRight", Some("ArrowRight"), 39),
        '\u{E015}' => named("ArrowDown", Some("ArrowDown"), 40),
        '\u{E016}' => named("Insert", Some("Insert"), 45),
        '\u{E017}' => named("Delete", Some("Delete"), 46),
        '\u{E031}' => named("F1", Some("F1"), 112),
        '\u{E032}' => named("F2", Some("F2"), 113),
        '\u{E033}' => named("F3", Some("F3"), 114),
        '\u{E034}' => named("F4", Some("F4"), 115),
        '\u{E035}' => named("F5", Some("F5"), 116),
        '\u{E036}' => named("F6", Some("F6"), 117),
        '\u{E037}' => named("F7", Some("F7"), 118),
        '\u{E038}' => named("F8", Some("F8"), 119),
        '\u{E039}' => named("F9", Some("F9"), 120),
        '\u{E03A}' => named("F10", Some("F10"), 121),
        '\u{E03B}' => named("F11", Some("F11"), 122),
        '\u{E03C}' => named("F12", Some("F12"), 123),
        '\u{E03D}' => modifier("Meta", "MetaLeft", 91, 4),
        '\u{E050}' => modifier("Shift", "ShiftRight", 16, 8),
        '\u{E051}' => modifier("Control", "ControlRight", 17, 2),
        '\u{E052}' => modifier("Alt", "AltRight", 18, 1),
        '\u{E053}' => modifier("Meta", "MetaRight", 92, 4),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
