//! script module parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::{ArgumentValue, ResultOwnership, SerializationOptions, Target};

/// Realm kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RealmType {
    /// A window (frame) realm.
    Window,
    /// A dedicated worker.
    DedicatedWorker,
    /// A shared worker.
    SharedWorker,
    /// A service worker.
    ServiceWorker,
    /// Unspecified worker.
    Worker,
    /// CSS paint worklet.
    PaintWorklet,
    /// Audio worklet.
    AudioWorklet,
    /// Unspecified worklet.
    Worklet,
}

/// Parameters for script.evaluate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Realm or context to evaluate in.
    pub target: Target,
    /// Whether to await a returned promise.
    pub await_promise: bool,
    /// Handle ownership of the result.
    #[serde(default)]
    pub result_ownership: Option<ResultOwnership>,
    /// Result serialization options.
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    /// Whether to evaluate with user activation.
    #[serde(default)]
    pub user_activation: Option<bool>,
}

/// Parameters for script.callFunction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionParams {
    /// Source of the function to call.
    pub function_declaration: String,
    /// Realm or context to call in.
    pub target: Target,
    /// Whether to await a returned promise.
    pub await_promise: bool,
    /// Arguments to pass.
    #[serde(default)]
    pub arguments: Option<Vec<ArgumentValue>>,
    /// The `this` value.
    #[serde(default)]
    pub this: Option<ArgumentValue>,
    /// Handle ownership of the result.
    #[serde(default)]
    pub result_ownership: Option<ResultOwnership>,
    /// Result serialization options.
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    /// Whether to call with user activation.
    #[serde(default)]
    pub user_activation: Option<bool>,
}

/// Parameters for script.disown.
#[derive(Debug, Clone, Deserialize)]
pub struct DisownParams {
    /// Handles to release.
    pub handles: Vec<String>,
    /// Realm or context the handles belong to.
    pub target: Target,
}

/// Parameters for script.getRealms.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GetRealmsParams {
    /// Restrict to realms of this context.
    #[serde(default)]
    pub context: Option<String>,
    /// Restrict to realms of this type.
    #[serde(default, rename = "type")]
    pub realm_type: Option<RealmType>,
}

/// Parameters for script.addPreloadScript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPreloadScriptParams {
    /// Function to run at document start.
    pub function_declaration: String,
    /// Channel arguments to pass to the function.
    #[serde(default)]
    pub arguments: Option<Vec<ArgumentValue>>,
    /// Top-level contexts to scope the script to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to scope the script to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
    /// Sandbox to run the script in.
    #[serde(default)]
    pub sandbox: Option<String>,
}

/// Result of script.addPreloadScript.
#[derive(Debug, Clone, Serialize)]
pub struct AddPreloadScriptResult {
    /// Id of the registered script.
    pub script: String,
}

/// Parameters for script.removePreloadScript.
#[derive(Debug, Clone, Deserialize)]
pub struct RemovePreloadScriptParams {
    /// Id of the script to remove.
    pub script: String,
}

/// One realm as reported by script.getRealms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmInfo {
    /// Realm id.
    pub realm: String,
    /// Realm origin.
    pub origin: String,
    /// Realm type.
    #[serde(rename = "type")]
    pub realm_type: RealmType,
    /// Browsing context, for window realms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Sandbox name, for isolated window realms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
}

/// Result of script.getRealms.
#[derive(Debug, Clone, Serialize)]
pub struct GetRealmsResult {
    /// Matching realms.
    pub realms: Vec<RealmInfo>,
}

/// Outcome of an evaluation: success with a serialized result, or the
/// thrown exception.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvaluateResult {
    /// The script completed.
    Success {
        /// Serialized remote value.
        result: Value,
        /// Realm the script ran in.
        realm: String,
    },
    /// The script threw.
    Exception {
        /// Serialized exception details.
        #[serde(rename = "exceptionDetails")]
        exception_details: Value,
        /// Realm the script ran in.
        realm: String,
    },
}

/// Payload of script.message events from a channel.
#[derive(Debug, Clone, Serialize)]
pub struct MessageParams {
    /// Channel id the message was sent on.
    pub channel: String,
    /// Serialized message payload.
    pub data: Value,
    /// The realm and context the message originated from.
    pub source: Source,
}

/// Event source descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    /// Realm id.
    pub realm: String,
    /// Browsing context id, for window realms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}
