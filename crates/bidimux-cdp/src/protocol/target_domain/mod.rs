//! Target domain types.
//!
//! The Target domain supports discovering and attaching to browser targets
//! (pages, out-of-process iframes, workers) and managing browser contexts.

use serde::{Deserialize, Serialize};

/// Unique target identifier.
pub type TargetId = String;

/// Unique session identifier for an attached target.
pub type SessionId = String;

/// Browser context identifier.
pub type BrowserContextId = String;

/// Information about a target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    /// Target identifier.
    pub target_id: TargetId,
    /// Target type ("page", "iframe", "worker", "service_worker", ...).
    #[serde(rename = "type")]
    pub target_type: String,
    /// Target title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Whether the target has an attached client.
    pub attached: bool,
    /// Opener target id, for window.open targets.
    pub opener_id: Option<TargetId>,
    /// Frame id of the opener window, if any.
    pub opener_frame_id: Option<String>,
    /// Browser context the target belongs to.
    pub browser_context_id: Option<BrowserContextId>,
    /// Subtype hint, e.g. "prerender".
    pub subtype: Option<String>,
}

// =============================================================================
// Commands
// =============================================================================

/// Parameters for Target.getTargets.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GetTargetsParams {}

/// Result of Target.getTargets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTargetsResult {
    /// The list of targets.
    pub target_infos: Vec<TargetInfo>,
}

/// Parameters for Target.attachToTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetParams {
    /// Target to attach to.
    pub target_id: TargetId,
    /// Enables "flat" access to the session via specifying sessionId
    /// attribute in the commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

/// Result of Target.attachToTarget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
    /// Id assigned to the session.
    pub session_id: SessionId,
}

/// Parameters for Target.setAutoAttach.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAutoAttachParams {
    /// Whether to auto-attach to related targets.
    pub auto_attach: bool,
    /// Whether to pause new targets until runIfWaitingForDebugger.
    pub wait_for_debugger_on_start: bool,
    /// Enables "flat" access to the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

/// Parameters for Target.setDiscoverTargets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscoverTargetsParams {
    /// Whether to discover available targets.
    pub discover: bool,
}

/// Parameters for Target.createTarget.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetParams {
    /// The initial URL the page will be navigated to.
    pub url: String,
    /// Browser context to create the page in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
    /// Whether to create a new window or tab.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_window: Option<bool>,
    /// Whether to create the target in background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
}

/// Result of Target.createTarget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
    /// The id of the page opened.
    pub target_id: TargetId,
}

/// Parameters for Target.closeTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    /// Target to close.
    pub target_id: TargetId,
}

/// Parameters for Target.activateTarget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTargetParams {
    /// Target to activate.
    pub target_id: TargetId,
}

/// Parameters for Target.createBrowserContext.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrowserContextParams {
    /// Dispose the context on session detach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispose_on_detach: Option<bool>,
    /// Proxy server string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_server: Option<String>,
    /// Proxy bypass list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_bypass_list: Option<String>,
}

/// Result of Target.createBrowserContext.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrowserContextResult {
    /// The id of the context created.
    pub browser_context_id: BrowserContextId,
}

/// Parameters for Target.disposeBrowserContext.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposeBrowserContextParams {
    /// Context to dispose.
    pub browser_context_id: BrowserContextId,
}

/// Result of Target.getBrowserContexts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBrowserContextsResult {
    /// Ids of all non-default browser contexts.
    pub browser_context_ids: Vec<BrowserContextId>,
}

// =============================================================================
// Events
// =============================================================================

/// Event: Target.attachedToTarget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedToTargetEvent {
    /// Identifier assigned to the session used to send/receive messages.
    pub session_id: SessionId,
    /// Target info.
    pub target_info: TargetInfo,
    /// Whether the target is paused waiting for runIfWaitingForDebugger.
    pub waiting_for_debugger: bool,
}

/// Event: Target.detachedFromTarget
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedFromTargetEvent {
    /// Detached session id.
    pub session_id: SessionId,
    /// Deprecated target id, still emitted by Chromium.
    pub target_id: Option<TargetId>,
}

/// Event: Target.targetInfoChanged
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfoChangedEvent {
    /// Updated target info.
    pub target_info: TargetInfo,
}

/// Event: Target.targetCreated
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCreatedEvent {
    /// Created target info.
    pub target_info: TargetInfo,
}

/// Event: Target.targetDestroyed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDestroyedEvent {
    /// Destroyed target id.
    pub target_id: TargetId,
}

#[cfg(test)]
mod tests;
