//! input module parameters.

use serde::Deserialize;

use super::browsing_context::SharedReference;

/// Parameters for input.performActions.
#[derive(Debug, Clone, Deserialize)]
pub struct PerformActionsParams {
    /// Context to dispatch into.
    pub context: String,
    /// One action sequence per input source.
    pub actions: Vec<SourceActions>,
}

/// Parameters for input.releaseActions.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseActionsParams {
    /// Context whose input state to reset.
    pub context: String,
}

/// Parameters for input.setFiles.
#[derive(Debug, Clone, Deserialize)]
pub struct SetFilesParams {
    /// Context owning the element.
    pub context: String,
    /// The file input element.
    pub element: SharedReference,
    /// Absolute file paths to set.
    pub files: Vec<String>,
}

/// Action sequence of one input source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceActions {
    /// No-op source; only pauses.
    None {
        /// Source id.
        id: String,
        /// The pauses.
        actions: Vec<PauseAction>,
    },
    /// Keyboard source.
    Key {
        /// Source id.
        id: String,
        /// Key actions in tick order.
        actions: Vec<KeyAction>,
    },
    /// Pointer source.
    Pointer {
        /// Source id.
        id: String,
        /// Pointer kind parameters.
        #[serde(default)]
        parameters: Option<PointerParameters>,
        /// Pointer actions in tick order.
        actions: Vec<PointerAction>,
    },
    /// Wheel source.
    Wheel {
        /// Source id.
        id: String,
        /// Wheel actions in tick order.
        actions: Vec<WheelAction>,
    },
}

/// Pointer kind of a pointer source.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PointerParameters {
    /// "mouse", "pen" or "touch".
    #[serde(default)]
    pub pointer_type: Option<String>,
}

/// A pause in any source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PauseAction {
    /// Wait out the tick, or a given duration.
    Pause {
        /// Milliseconds to wait.
        #[serde(default)]
        duration: Option<u64>,
    },
}

/// Keyboard actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyAction {
    /// Wait out the tick.
    Pause {
        /// Milliseconds to wait.
        #[serde(default)]
        duration: Option<u64>,
    },
    /// Press a key down.
    KeyDown {
        /// The key's normalised value (a single code point or a named key).
        value: String,
    },
    /// Release a key.
    KeyUp {
        /// The key's normalised value.
        value: String,
    },
}

/// Where pointer coordinates originate.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(untagged)]
pub enum Origin {
    /// Keyword origins: "viewport" or "pointer".
    Keyword(String),
    /// An element origin.
    Element {
        /// Origin type tag, always "element".
        #[serde(rename = "type")]
        origin_type: String,
        /// The element.
        element: SharedReference,
    },
    /// The viewport, when unspecified.
    #[default]
    Unspecified,
}

/// Pointer actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerAction {
    /// Wait out the tick.
    Pause {
        /// Milliseconds to wait.
        #[serde(default)]
        duration: Option<u64>,
    },
    /// Press a button.
    PointerDown {
        /// Button index.
        button: u32,
    },
    /// Release a button.
    PointerUp {
        /// Button index.
        button: u32,
    },
    /// Move the pointer.
    PointerMove {
        /// Destination x, relative to the origin.
        x: f64,
        /// Destination y, relative to the origin.
        y: f64,
        /// Movement duration.
        #[serde(default)]
        duration: Option<u64>,
        /// Coordinate origin.
        #[serde(default)]
        origin: Option<Origin>,
    },
}

/// Wheel actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WheelAction {
    /// Wait out the tick.
    Pause {
        /// Milliseconds to wait.
        #[serde(default)]
        duration: Option<u64>,
    },
    /// Scroll at a position.
    Scroll {
        /// Scroll position x, relative to the origin.
        x: f64,
        /// Scroll position y, relative to the origin.
        y: f64,
        /// Horizontal scroll delta.
        #[serde(rename = "deltaX")]
        delta_x: f64,
        /// Vertical scroll delta.
        #[serde(rename = "deltaY")]
        delta_y: f64,
        /// Scroll duration.
        #[serde(default)]
        duration: Option<u64>,
        /// Coordinate origin.
        #[serde(default)]
        origin: Option<Origin>,
    },
}
