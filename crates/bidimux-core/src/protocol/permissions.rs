//! permissions module parameters.

use serde::Deserialize;
use serde_json::Value;

/// Permission states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Permission granted.
    Granted,
    /// Permission denied.
    Denied,
    /// Ask the user on access.
    Prompt,
}

/// Parameters for permissions.setPermission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionParams {
    /// Permission descriptor; at least a `name` member.
    pub descriptor: Value,
    /// The state to set.
    pub state: PermissionState,
    /// Origin the permission applies to.
    pub origin: String,
    /// User context to apply in; the default context when absent.
    #[serde(default)]
    pub user_context: Option<String>,
}
