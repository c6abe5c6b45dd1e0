//! browsingContext module parameters, results and event payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::SerializationOptions;

/// How long a navigation command waits before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessState {
    /// Return as soon as the navigation is started.
    #[default]
    None,
    /// Await DOMContentLoaded.
    Interactive,
    /// Await the load event.
    Complete,
}

/// Parameters for browsingContext.getTree.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetTreeParams {
    /// Depth limit; unlimited when absent.
    #[serde(default)]
    pub max_depth: Option<u64>,
    /// Subtree root; all top-level contexts when absent.
    #[serde(default)]
    pub root: Option<String>,
}

/// Parameters for browsingContext.create.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    /// Whether to open a tab or a window.
    #[serde(rename = "type")]
    pub create_type: CreateType,
    /// Context to open the new one next to.
    #[serde(default)]
    pub reference_context: Option<String>,
    /// Whether to open in background.
    #[serde(default)]
    pub background: Option<bool>,
    /// User context to create the context in.
    #[serde(default)]
    pub user_context: Option<String>,
}

/// What kind of top-level traversable to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateType {
    /// A tab in an existing window.
    Tab,
    /// A new window.
    Window,
}

/// Parameters for browsingContext.close.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseParams {
    /// Context to close.
    pub context: String,
    /// Whether beforeunload prompts may fire.
    #[serde(default)]
    pub prompt_unload: Option<bool>,
}

/// Parameters for browsingContext.navigate.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateParams {
    /// Context to navigate.
    pub context: String,
    /// Destination URL.
    pub url: String,
    /// Readiness state to await.
    #[serde(default)]
    pub wait: Option<ReadinessState>,
}

/// Parameters for browsingContext.reload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadParams {
    /// Context to reload.
    pub context: String,
    /// Bypass the cache.
    #[serde(default)]
    pub ignore_cache: Option<bool>,
    /// Readiness state to await.
    #[serde(default)]
    pub wait: Option<ReadinessState>,
}

/// Parameters for browsingContext.activate.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateParams {
    /// Context to bring to front.
    pub context: String,
}

/// Parameters for browsingContext.handleUserPrompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleUserPromptParams {
    /// Context whose prompt to handle.
    pub context: String,
    /// Accept (true) or dismiss (false); dismiss by default.
    #[serde(default)]
    pub accept: Option<bool>,
    /// Text to enter into a prompt dialog.
    #[serde(default)]
    pub user_text: Option<String>,
}

/// Where a screenshot's coordinate system originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotOrigin {
    /// The visual viewport.
    #[default]
    Viewport,
    /// The full document.
    Document,
}

/// Requested screenshot encoding.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageFormat {
    /// Media type, e.g. "image/png".
    #[serde(rename = "type")]
    pub image_type: String,
    /// Compression quality in [0, 1] for lossy formats.
    #[serde(default)]
    pub quality: Option<f64>,
}

/// Clip of a screenshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipRectangle {
    /// A box in origin coordinates.
    Box {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Box width; negative values normalise to the opposite edge.
        width: f64,
        /// Box height; negative values normalise to the opposite edge.
        height: f64,
    },
    /// The bounding box of an element.
    Element {
        /// Shared reference to the element.
        element: SharedReference,
    },
}

/// A shared-id reference to a DOM node.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedReference {
    /// Shared id of the node.
    pub shared_id: String,
    /// Optional handle fallback.
    #[serde(default)]
    pub handle: Option<String>,
}

/// Parameters for browsingContext.captureScreenshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureScreenshotParams {
    /// Context to capture.
    pub context: String,
    /// Coordinate origin; viewport by default.
    #[serde(default)]
    pub origin: Option<ScreenshotOrigin>,
    /// Output encoding; PNG by default.
    #[serde(default)]
    pub format: Option<ImageFormat>,
    /// Clip rectangle; full origin rect by default.
    #[serde(default)]
    pub clip: Option<ClipRectangle>,
}

/// Print margins, in centimeters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PrintMarginParameters {
    /// Bottom margin.
    #[serde(default)]
    pub bottom: Option<f64>,
    /// Left margin.
    #[serde(default)]
    pub left: Option<f64>,
    /// Right margin.
    #[serde(default)]
    pub right: Option<f64>,
    /// Top margin.
    #[serde(default)]
    pub top: Option<f64>,
}

/// Print page size, in centimeters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PrintPageParameters {
    /// Page height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Page width.
    #[serde(default)]
    pub width: Option<f64>,
}

/// Print orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintOrientation {
    /// Portrait orientation.
    #[default]
    Portrait,
    /// Landscape orientation.
    Landscape,
}

/// One page-range element: a number or a "N-M" style string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PageRange {
    /// A single page number.
    Number(u64),
    /// A range expression string.
    Expression(String),
}

/// Parameters for browsingContext.print.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintParams {
    /// Context to print.
    pub context: String,
    /// Print background graphics.
    #[serde(default)]
    pub background: Option<bool>,
    /// Margins in centimeters.
    #[serde(default)]
    pub margin: Option<PrintMarginParameters>,
    /// Page orientation.
    #[serde(default)]
    pub orientation: Option<PrintOrientation>,
    /// Page size in centimeters.
    #[serde(default)]
    pub page: Option<PrintPageParameters>,
    /// Pages to print; all pages when absent.
    #[serde(default)]
    pub page_ranges: Option<Vec<PageRange>>,
    /// Print scale.
    #[serde(default)]
    pub scale: Option<f64>,
    /// Shrink content to fit the page.
    #[serde(default)]
    pub shrink_to_fit: Option<bool>,
}

/// A viewport override.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: u64,
    /// Height in CSS pixels.
    pub height: u64,
}

/// Parameters for browsingContext.setViewport.
///
/// `viewport` and `devicePixelRatio` distinguish absent (keep) from null
/// (clear the override).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetViewportParams {
    /// Context to change; must be top-level.
    pub context: String,
    /// Viewport override, null to clear.
    #[serde(default, deserialize_with = "super::double_option")]
    pub viewport: Option<Option<Viewport>>,
    /// Device pixel ratio override, null to clear.
    #[serde(default, deserialize_with = "super::double_option")]
    pub device_pixel_ratio: Option<Option<f64>>,
}

/// Parameters for browsingContext.traverseHistory.
#[derive(Debug, Clone, Deserialize)]
pub struct TraverseHistoryParams {
    /// Context whose history to traverse.
    pub context: String,
    /// Offset from the current entry.
    pub delta: i64,
}

/// Node locator variants for browsingContext.locateNodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Locator {
    /// CSS selector.
    Css {
        /// The selector text.
        value: String,
    },
    /// XPath expression.
    Xpath {
        /// The expression text.
        value: String,
    },
    /// Rendered-text search.
    InnerText {
        /// Text to search for.
        value: String,
        /// Case-insensitive matching.
        #[serde(default)]
        ignore_case: Option<bool>,
        /// "full" or "partial" matching.
        #[serde(default)]
        match_type: Option<String>,
        /// Depth limit of the search.
        #[serde(default)]
        max_depth: Option<u64>,
    },
    /// Accessibility name/role search.
    Accessibility {
        /// Name and role filters.
        value: AccessibilityLocatorValue,
    },
}

/// Filters of an accessibility locator.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AccessibilityLocatorValue {
    /// Computed accessible name.
    #[serde(default)]
    pub name: Option<String>,
    /// Computed role.
    #[serde(default)]
    pub role: Option<String>,
}

/// Parameters for browsingContext.locateNodes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateNodesParams {
    /// Context to search in.
    pub context: String,
    /// The locator.
    pub locator: Locator,
    /// Cap on the number of returned nodes.
    #[serde(default)]
    pub max_node_count: Option<u64>,
    /// Serialization options for the returned nodes.
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    /// Nodes to start the search from.
    #[serde(default)]
    pub start_nodes: Option<Vec<SharedReference>>,
}

// =============================================================================
// Results and event payloads
// =============================================================================

/// A node of the context tree as reported to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// Context id.
    pub context: String,
    /// Current document URL.
    pub url: String,
    /// User context the context belongs to.
    pub user_context: String,
    /// Child contexts, depth-limited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Info>>,
    /// Parent context id; absent on top-level contexts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// The context that opened this one, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_opener: Option<String>,
    /// Client window the context is displayed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_window: Option<String>,
}

/// Payload of every navigation-lifecycle event.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationInfo {
    /// Context that navigates.
    pub context: String,
    /// Mediator-minted navigation id.
    pub navigation: Option<String>,
    /// Event timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// Navigation URL.
    pub url: String,
}

/// Result of browsingContext.navigate and reload.
#[derive(Debug, Clone, Serialize)]
pub struct NavigateResult {
    /// Mediator-minted navigation id.
    pub navigation: Option<String>,
    /// The URL the navigation was issued for.
    pub url: String,
}

/// Payload of browsingContext.userPromptOpened.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPromptOpened {
    /// Context showing the prompt.
    pub context: String,
    /// Prompt handler configured for this prompt type.
    pub handler: String,
    /// Prompt message.
    pub message: String,
    /// Prompt kind: alert, confirm, prompt or beforeunload.
    #[serde(rename = "type")]
    pub prompt_type: String,
    /// Default value of a prompt dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Payload of browsingContext.userPromptClosed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPromptClosed {
    /// Context that showed the prompt.
    pub context: String,
    /// Whether the prompt was accepted.
    pub accepted: bool,
    /// Prompt kind.
    #[serde(rename = "type")]
    pub prompt_type: String,
    /// Text the user entered, for prompt dialogs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,
}

/// Result of browsingContext.locateNodes.
#[derive(Debug, Clone, Serialize)]
pub struct LocateNodesResult {
    /// The located nodes as remote values.
    pub nodes: Vec<Value>,
}
