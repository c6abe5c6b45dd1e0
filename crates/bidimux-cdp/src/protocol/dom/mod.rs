//! DOM domain types.
//!
//! The mediator uses the DOM domain only to translate between backend node
//! ids (the stable half of a BiDi sharedId) and Runtime remote objects.

use serde::{Deserialize, Serialize};

use super::runtime::{ExecutionContextId, RemoteObject, RemoteObjectId};

/// Unique DOM node identifier, stable across document lifetime.
pub type BackendNodeId = i64;

/// Parameters for DOM.resolveNode.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolveNodeParams {
    /// Backend identifier of the node to resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_node_id: Option<BackendNodeId>,
    /// Execution context in which to resolve the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
}

/// Result of DOM.resolveNode.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveNodeResult {
    /// JavaScript object wrapper for given node.
    pub object: RemoteObject,
}

/// Parameters for DOM.describeNode.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DescribeNodeParams {
    /// JavaScript object id of the node wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    /// The maximum depth at which children should be retrieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,
}

/// Result of DOM.describeNode.
#[derive(Debug, Clone, Deserialize)]
pub struct DescribeNodeResult {
    /// Node description.
    pub node: Node,
}

/// A DOM node description; only the fields the mediator reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Backend node identifier.
    pub backend_node_id: BackendNodeId,
    /// Node name.
    pub node_name: Option<String>,
    /// Frame ID for frame owner elements.
    pub frame_id: Option<String>,
}

/// Parameters for DOM.setFileInputFiles.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetFileInputFilesParams {
    /// Array of file paths to set.
    pub files: Vec<String>,
    /// JavaScript object id of the input node wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    /// Backend id of the input node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_node_id: Option<BackendNodeId>,
}
