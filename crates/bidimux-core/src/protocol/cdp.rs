//! cdp module parameters and results: the raw-CDP escape hatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for cdp.sendCommand.
#[derive(Debug, Clone, Deserialize)]
pub struct SendCommandParams {
    /// CDP method to send.
    pub method: String,
    /// CDP parameters, forwarded as-is.
    #[serde(default)]
    pub params: Option<Value>,
    /// CDP session to send on; the browser session when absent.
    #[serde(default)]
    pub session: Option<String>,
}

/// Result of cdp.sendCommand.
#[derive(Debug, Clone, Serialize)]
pub struct SendCommandResult {
    /// The raw CDP result.
    pub result: Value,
    /// The session the command ran on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

/// Parameters for cdp.getSession.
#[derive(Debug, Clone, Deserialize)]
pub struct GetSessionParams {
    /// Browsing context to look up.
    pub context: String,
}

/// Result of cdp.getSession.
#[derive(Debug, Clone, Serialize)]
pub struct GetSessionResult {
    /// The CDP session id of the context's target.
    pub session: Option<String>,
}

/// Parameters for cdp.resolveRealm.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRealmParams {
    /// BiDi realm id to resolve.
    pub realm: String,
}

/// Result of cdp.resolveRealm.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRealmResult {
    /// The CDP execution context id backing the realm.
    pub execution_context_id: i64,
}
