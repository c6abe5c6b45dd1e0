//! Page domain command results.

use serde::Deserialize;

use super::types::{FrameId, FrameTree, LoaderId, NavigationEntry};

/// Result of Page.navigate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    /// Frame id that has navigated (or failed to).
    pub frame_id: FrameId,
    /// Loader identifier; absent for same-document navigations.
    pub loader_id: Option<LoaderId>,
    /// User friendly error message if navigation failed.
    pub error_text: Option<String>,
}

/// Result of Page.getFrameTree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeResult {
    /// Present frame tree structure.
    pub frame_tree: FrameTree,
}

/// Result of Page.captureScreenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotResult {
    /// Base64-encoded image data.
    pub data: String,
}

/// Result of Page.printToPDF.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintToPdfResult {
    /// Base64-encoded pdf data.
    pub data: String,
}

/// Result of Page.getNavigationHistory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNavigationHistoryResult {
    /// Index of the current navigation history entry.
    pub current_index: i64,
    /// Array of navigation history entries.
    pub entries: Vec<NavigationEntry>,
}

/// Result of Page.addScriptToEvaluateOnNewDocument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScriptToEvaluateOnNewDocumentResult {
    /// Identifier of the added script.
    pub identifier: String,
}

/// Result of Page.createIsolatedWorld.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIsolatedWorldResult {
    /// Execution context of the isolated world.
    pub execution_context_id: i64,
}
