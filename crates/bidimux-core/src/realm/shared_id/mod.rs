//! Shared ids: stable references to DOM nodes.
//!
//! A shared id has the form `<navigableId>_element_<backendNodeId>`. The
//! navigable half pins the node to one document, so a shared id from a
//! navigated-away document no longer resolves.

use crate::error::{Error, ErrorCode, Result};

/// Separator between the navigable id and the backend node id.
const INFIX: &str = "_element_";

/// A parsed shared id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedId {
    /// Navigable (frame) the node belongs to.
    pub navigable_id: String,
    /// CDP backend node id.
    pub backend_node_id: i64,
}

impl SharedId {
    /// Format a shared id for the wire.
    pub fn format(navigable_id: &str, backend_node_id: i64) -> String {
        format!("{navigable_id}{INFIX}{backend_node_id}")
    }

    /// Parse a wire shared id.
    ///
    /// # Errors
    ///
    /// `no such node` when the string does not have the shared-id shape.
    pub fn parse(shared_id: &str) -> Result<Self> {
        let Some((navigable_id, node_part)) = shared_id.split_once(INFIX) else {
            return Err(Self::unknown(shared_id));
        };
        let Ok(backend_node_id) = node_part.parse::<i64>() else {
            return Err(Self::unknown(shared_id));
        };
        if navigable_id.is_empty() {
            return Err(Self::unknown(shared_id));
        }
        Ok(Self {
            navigable_id: navigable_id.to_string(),
            backend_node_id,
        })
    }

    fn unknown(shared_id: &str) -> Error {
        Error::new(
            ErrorCode::NoSuchNode,
            format!("Unable to find node with sharedId '{shared_id}'"),
        )
    }
}

#[cfg(test)]
mod tests;
