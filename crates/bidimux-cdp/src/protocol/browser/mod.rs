//! Browser domain types.
//!
//! Window management and permission overrides at the browser level.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::target_domain::{BrowserContextId, TargetId};

/// Browser window identifier.
pub type WindowId = i64;

/// State of a browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    /// Normal floating window.
    Normal,
    /// Minimized window.
    Minimized,
    /// Maximized window.
    Maximized,
    /// Fullscreen window.
    Fullscreen,
}

/// Browser window bounds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// The offset from the left edge of the screen in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<i64>,
    /// The offset from the top edge of the screen in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<i64>,
    /// The window width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    /// The window height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    /// The window state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_state: Option<WindowState>,
}

/// Result of Browser.getVersion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionResult {
    /// Protocol version.
    pub protocol_version: String,
    /// Product name and version.
    pub product: String,
    /// Product revision.
    pub revision: String,
    /// User-Agent.
    pub user_agent: String,
    /// V8 version.
    pub js_version: String,
}

/// Parameters for Browser.getWindowForTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetParams {
    /// Target to look the window up for.
    pub target_id: TargetId,
}

/// Result of Browser.getWindowForTarget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWindowForTargetResult {
    /// Browser window id.
    pub window_id: WindowId,
    /// Bounds information of the window.
    pub bounds: Bounds,
}

/// Parameters for Browser.setWindowBounds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWindowBoundsParams {
    /// Browser window id.
    pub window_id: WindowId,
    /// New window bounds. 'minimized', 'maximized' and 'fullscreen' states
    /// cannot be combined with offsets or dimensions.
    pub bounds: Bounds,
}

/// Descriptor of a permission to override.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDescriptor {
    /// Name of the permission, e.g. "geolocation".
    pub name: String,
    /// Extra descriptor members, passed through as-is.
    #[serde(flatten)]
    pub extra: Value,
}

/// Permission override state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionSetting {
    /// Permission granted.
    Granted,
    /// Permission denied.
    Denied,
    /// Ask the user on access.
    Prompt,
}

/// Parameters for Browser.setPermission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionParams {
    /// Descriptor of the permission to override.
    pub permission: PermissionDescriptor,
    /// Setting of the permission.
    pub setting: PermissionSetting,
    /// Origin the permission applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Context to override; default context when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}
