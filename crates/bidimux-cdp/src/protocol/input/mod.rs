//! Input domain types.
//!
//! Trusted input event dispatch: keyboard, mouse and wheel. BiDi action
//! sequences are lowered to these events one tick at a time.

use serde::Serialize;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// No button.
    #[default]
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// Back button.
    Back,
    /// Forward button.
    Forward,
}

/// Parameters for Input.dispatchKeyEvent.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    /// Type of the key event: "keyDown", "keyUp", "rawKeyDown", "char".
    #[serde(rename = "type")]
    pub event_type: String,
    /// Bit field representing pressed modifier keys.
    /// Alt=1, Ctrl=2, Meta/Command=4, Shift=8.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<u32>,
    /// Text as generated by processing a virtual key code with a keyboard
    /// layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text that would have been generated by the keyboard if no modifiers
    /// were pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmodified_text: Option<String>,
    /// Unique DOM defined string value for each physical key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Unique DOM defined string value describing the meaning of the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Windows virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows_virtual_key_code: Option<i64>,
    /// Native virtual key code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_virtual_key_code: Option<i64>,
    /// Whether the event was generated from auto repeat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repeat: Option<bool>,
    /// Whether the event was generated from the keypad.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_keypad: Option<bool>,
    /// Whether the key is on the numeric keypad or one of the arrow keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<i64>,
}

/// Parameters for Input.dispatchMouseEvent.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    /// Type of the mouse event: "mousePressed", "mouseReleased",
    /// "mouseMoved", "mouseWheel".
    #[serde(rename = "type")]
    pub event_type: String,
    /// X coordinate relative to the main frame's viewport in CSS pixels.
    pub x: f64,
    /// Y coordinate relative to the main frame's viewport in CSS pixels.
    pub y: f64,
    /// Bit field representing pressed modifier keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<u32>,
    /// Mouse button.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<MouseButton>,
    /// A number indicating which buttons are pressed when a mouse event is
    /// triggered. Left=1, Right=2, Middle=4, Back=8, Forward=16, None=0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<u32>,
    /// Number of times the mouse button was clicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_count: Option<i64>,
    /// X delta in CSS pixels for mouse wheel event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    /// Y delta in CSS pixels for mouse wheel event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
    /// Pointer type: "mouse" (default) or "pen".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer_type: Option<String>,
}

/// Parameters for Input.insertText.
#[derive(Debug, Clone, Serialize)]
pub struct InsertTextParams {
    /// The text to insert.
    pub text: String,
}
