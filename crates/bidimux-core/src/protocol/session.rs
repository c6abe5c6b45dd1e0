//! session module parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Empty parameter set shared by parameterless commands.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EmptyParams {}

/// Parameters for session.subscribe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    /// Event names: leaf names or whole module names.
    pub events: Vec<String>,
    /// Top-level contexts to scope the subscription to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to scope the subscription to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Result of session.subscribe.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResult {
    /// Id of the new subscription.
    pub subscription: String,
}

/// Parameters for session.unsubscribe (by attributes).
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeRequest {
    /// Event names to unsubscribe from.
    pub events: Vec<String>,
    /// Contexts to unsubscribe; all when absent.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Parameters for session.unsubscribe (by id).
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeByIdRequest {
    /// Subscriptions to remove.
    pub subscriptions: Vec<String>,
}

/// Result of session.status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// Whether a new session can be attached.
    pub ready: bool,
    /// Human readable explanation.
    pub message: String,
}

/// Parameters for session.new.
#[derive(Debug, Clone, Deserialize)]
pub struct NewParams {
    /// Requested capabilities, passed through unvalidated.
    #[serde(default)]
    pub capabilities: Value,
}

/// Result of session.new.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    /// Assigned session id.
    pub session_id: String,
    /// Matched capabilities.
    pub capabilities: Value,
}
