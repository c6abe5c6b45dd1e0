//! Accessibility domain types.
//!
//! The accessibility locator only needs the domain enabled and the full AX
//! tree materialised; node matching happens in-page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique accessibility node identifier.
pub type AxNodeId = String;

/// Parameters for Accessibility.enable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for Accessibility.getRootAXNode.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetRootAxNodeParams {
    /// The frame in whose document the node resides; root frame if omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

/// Result of Accessibility.getRootAXNode.
#[derive(Debug, Clone, Deserialize)]
pub struct GetRootAxNodeResult {
    /// The root accessibility node.
    pub node: AxNode,
}

/// A node in the accessibility tree; only the fields the mediator reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxNode {
    /// Unique identifier for this node.
    pub node_id: AxNodeId,
    /// Whether this node is ignored for accessibility.
    pub ignored: bool,
    /// This node's role, whether explicit or implicit.
    pub role: Option<Value>,
    /// The accessible name for this node.
    pub name: Option<Value>,
    /// The backend ID for the associated DOM node, if any.
    pub backend_dom_node_id: Option<i64>,
}
