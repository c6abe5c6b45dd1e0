//! Page domain event types.

use serde::Deserialize;

use super::types::{DialogType, Frame, FrameId, LoaderId};

/// Event: Page.lifecycleEvent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEventEvent {
    /// Frame ID.
    pub frame_id: FrameId,
    /// Loader identifier.
    pub loader_id: LoaderId,
    /// Lifecycle event name ("init", "DOMContentLoaded", "load", ...).
    pub name: String,
    /// Monotonic timestamp.
    pub timestamp: f64,
}

/// Event: Page.frameStartedNavigating
///
/// Fired when a renderer-initiated or browser-initiated navigation starts,
/// before the frame has committed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStartedNavigatingEvent {
    /// Frame that is navigating.
    pub frame_id: FrameId,
    /// The loader the navigation will commit under.
    pub loader_id: LoaderId,
    /// Destination URL.
    pub url: String,
    /// Navigation type, e.g. "differentDocument", "historySameDocument".
    pub navigation_type: Option<String>,
}

/// Event: Page.frameNavigated
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNavigatedEvent {
    /// Frame object.
    pub frame: Frame,
    /// Navigation type.
    #[serde(rename = "type")]
    pub navigation_type: Option<String>,
}

/// Event: Page.navigatedWithinDocument
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatedWithinDocumentEvent {
    /// Frame ID.
    pub frame_id: FrameId,
    /// Frame's new url.
    pub url: String,
    /// Kind of the navigation: "fragment", "historyApi" or "other".
    pub navigation_type: Option<String>,
}

/// Event: Page.frameAttached
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAttachedEvent {
    /// Id of the frame that has been attached.
    pub frame_id: FrameId,
    /// Parent frame identifier.
    pub parent_frame_id: FrameId,
}

/// Event: Page.frameDetached
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetachedEvent {
    /// Id of the frame that has been detached.
    pub frame_id: FrameId,
    /// Whether the frame was removed or moved to another process.
    pub reason: Option<String>,
}

/// Event: Page.javascriptDialogOpening
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptDialogOpeningEvent {
    /// Frame url.
    pub url: String,
    /// Message that will be displayed by the dialog.
    pub message: String,
    /// Dialog type.
    #[serde(rename = "type")]
    pub dialog_type: DialogType,
    /// True iff browser is capable of showing or acting on the given dialog.
    pub has_browser_handler: bool,
    /// Default dialog prompt.
    pub default_prompt: Option<String>,
}

/// Event: Page.javascriptDialogClosed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptDialogClosedEvent {
    /// Whether the dialog was accepted.
    pub result: bool,
    /// User input in case of prompt.
    pub user_input: String,
}
