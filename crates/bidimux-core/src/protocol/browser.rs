//! browser module parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for browser.createUserContext.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserContextParams {
    /// Whether targets of this user context ignore certificate errors.
    #[serde(default)]
    pub accept_insecure_certs: Option<bool>,
    /// Proxy configuration, passed through.
    #[serde(default)]
    pub proxy: Option<Value>,
}

/// Parameters for browser.removeUserContext.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserContextParams {
    /// User context to remove; removing "default" is an error.
    pub user_context: String,
}

/// One user context as reported to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContextInfo {
    /// User context id.
    pub user_context: String,
}

/// Result of browser.getUserContexts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUserContextsResult {
    /// All live user contexts, including "default".
    pub user_contexts: Vec<UserContextInfo>,
}

/// Client window states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientWindowState {
    /// Fullscreen.
    Fullscreen,
    /// Maximized.
    Maximized,
    /// Minimized.
    Minimized,
    /// Normal floating window.
    Normal,
}

/// One client window as reported to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWindowInfo {
    /// Whether the window has focus.
    pub active: bool,
    /// Client window id.
    pub client_window: String,
    /// Window height in pixels.
    pub height: u64,
    /// Window state.
    pub state: ClientWindowState,
    /// Window width in pixels.
    pub width: u64,
    /// Left edge position.
    pub x: i64,
    /// Top edge position.
    pub y: i64,
}

/// Result of browser.getClientWindows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetClientWindowsResult {
    /// All open client windows.
    pub client_windows: Vec<ClientWindowInfo>,
}

/// Parameters for browser.setClientWindowState.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetClientWindowStateParams {
    /// The window to change.
    pub client_window: String,
    /// Target state.
    #[serde(default)]
    pub state: Option<ClientWindowState>,
    /// New width, for the normal state.
    #[serde(default)]
    pub width: Option<u64>,
    /// New height, for the normal state.
    #[serde(default)]
    pub height: Option<u64>,
    /// New left edge, for the normal state.
    #[serde(default)]
    pub x: Option<i64>,
    /// New top edge, for the normal state.
    #[serde(default)]
    pub y: Option<i64>,
}
