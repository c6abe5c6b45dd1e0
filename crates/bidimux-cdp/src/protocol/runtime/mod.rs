//! Runtime domain types.
//!
//! The Runtime domain exposes the JavaScript runtime by means of remote
//! evaluation and mirror objects. The mediator drives it for script
//! evaluation, deep value serialization and execution-context tracking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique script identifier.
pub type ScriptId = String;

/// Unique execution context identifier, scoped to the target.
pub type ExecutionContextId = i64;

/// Remote object id.
pub type RemoteObjectId = String;

/// Mirror object referencing the original JavaScript object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object subtype hint.
    pub subtype: Option<String>,
    /// Object class name.
    pub class_name: Option<String>,
    /// Remote object value in case of primitive values or JSON values.
    pub value: Option<Value>,
    /// Primitive value which can not be JSON-stringified.
    pub unserializable_value: Option<String>,
    /// String representation of the object.
    pub description: Option<String>,
    /// Unique object identifier for non-primitive values.
    pub object_id: Option<RemoteObjectId>,
    /// Deep serialized value, present when deep serialization was requested.
    pub deep_serialized_value: Option<DeepSerializedValue>,
}

/// Deep-serialized representation of a mirror object.
///
/// This is the raw CDP form the mediator post-processes into a BiDi
/// RemoteValue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepSerializedValue {
    /// Serialized type tag ("string", "node", "platformobject", ...).
    #[serde(rename = "type")]
    pub value_type: String,
    /// Serialized payload; shape depends on the type tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Object id, set when the object was not fully serialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    /// Set if the object was seen before in the same serialization run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_local_object_reference: Option<u64>,
}

/// How evaluation results should be serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializationMode {
    /// Deep serialization into `deepSerializedValue`.
    Deep,
    /// Plain JSON value.
    Json,
    /// Only the object id.
    IdOnly,
}

/// Serialization options for evaluate/callFunctionOn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializationOptions {
    /// Serialization mode.
    pub serialization: SerializationMode,
    /// Deep serialization depth; unlimited when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u64>,
    /// Embedder-specific parameters (maxNodeDepth, includeShadowTree).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_parameters: Option<Value>,
}

/// Stack entry for runtime errors and assertions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// JavaScript function name.
    pub function_name: String,
    /// JavaScript script id.
    pub script_id: ScriptId,
    /// JavaScript script name or url.
    pub url: String,
    /// JavaScript script line number (0-based).
    pub line_number: i64,
    /// JavaScript script column number (0-based).
    pub column_number: i64,
}

/// Call frames for assertions or error messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTrace {
    /// JavaScript function name.
    pub call_frames: Vec<CallFrame>,
}

/// Detailed information about an exception.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception id.
    pub exception_id: i64,
    /// Exception text.
    pub text: String,
    /// Line number of the exception location (0-based).
    pub line_number: i64,
    /// Column number of the exception location (0-based).
    pub column_number: i64,
    /// Script ID of the exception location.
    pub script_id: Option<ScriptId>,
    /// URL of the exception location.
    pub url: Option<String>,
    /// JavaScript stack trace if available.
    pub stack_trace: Option<StackTrace>,
    /// Exception object if available.
    pub exception: Option<RemoteObject>,
    /// Execution context ID.
    pub execution_context_id: Option<ExecutionContextId>,
}

// ============================================================================
// Commands
// ============================================================================

/// Parameters for Runtime.enable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for Runtime.runIfWaitingForDebugger.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RunIfWaitingForDebuggerParams {}

/// Parameters for Runtime.evaluate.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Execution context to evaluate in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<ExecutionContextId>,
    /// In silent mode exceptions are not reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Whether the result is expected to be a JSON object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether execution should be treated as initiated by user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
    /// Whether execution should await for resulting value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    /// Specifies the result serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialization_options: Option<SerializationOptions>,
}

/// Result of Runtime.evaluate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Evaluation result.
    pub result: RemoteObject,
    /// Exception details if the evaluation threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// Parameters for Runtime.callFunctionOn.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    /// Declaration of the function to call.
    pub function_declaration: String,
    /// Identifier of the object to call function on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
    /// Call arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<CallArgument>>,
    /// In silent mode exceptions are not reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Whether the result is expected to be a JSON object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether execution should be treated as initiated by user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
    /// Whether execution should await for resulting value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    /// Specifies execution context which global object will be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
    /// Specifies the result serialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialization_options: Option<SerializationOptions>,
}

/// Call argument for callFunctionOn.
///
/// Either a primitive value, an unserializable value, or a remote object
/// handle; at most one of the fields is set.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallArgument {
    /// Primitive value or serializable javascript object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Primitive value which can not be JSON-stringified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    /// Remote object handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<RemoteObjectId>,
}

impl CallArgument {
    /// Argument passing a plain JSON value.
    pub fn from_value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Argument passing a primitive with no JSON form (`NaN`, `-0`, ...).
    pub fn unserializable(repr: impl Into<String>) -> Self {
        Self {
            unserializable_value: Some(repr.into()),
            ..Self::default()
        }
    }

    /// Argument referencing a live remote object.
    pub fn from_object_id(object_id: impl Into<String>) -> Self {
        Self {
            object_id: Some(object_id.into()),
            ..Self::default()
        }
    }
}

/// Result of Runtime.callFunctionOn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnResult {
    /// Call result.
    pub result: RemoteObject,
    /// Exception details if the call threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// Parameters for Runtime.releaseObject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseObjectParams {
    /// Identifier of the object to release.
    pub object_id: RemoteObjectId,
}

/// Parameters for Runtime.addBinding.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBindingParams {
    /// Name of the binding function.
    pub name: String,
    /// Execution context to add the binding to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
}

// ============================================================================
// Events
// ============================================================================

/// Execution context description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDescription {
    /// Unique execution context id.
    pub id: ExecutionContextId,
    /// Execution context origin.
    pub origin: String,
    /// Human readable name describing given context.
    pub name: String,
    /// Unique id across processes; stable over context lifetime.
    pub unique_id: Option<String>,
    /// Auxiliary data about the context, including frame information.
    pub aux_data: Option<ExecutionContextAuxData>,
}

/// Auxiliary data for execution context.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextAuxData {
    /// Frame ID associated with this execution context.
    pub frame_id: Option<String>,
    /// Whether this is the default context for the frame.
    pub is_default: Option<bool>,
    /// Type of the context ("default", "isolated", "worker").
    #[serde(rename = "type")]
    pub context_type: Option<String>,
}

/// Event: Runtime.executionContextCreated
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionContextCreatedEvent {
    /// Newly created execution context.
    pub context: ExecutionContextDescription,
}

/// Event: Runtime.executionContextDestroyed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDestroyedEvent {
    /// ID of the destroyed context.
    pub execution_context_id: ExecutionContextId,
}

/// Event: Runtime.executionContextsCleared
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionContextsClearedEvent {}

/// Event: Runtime.consoleAPICalled
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleApiCalledEvent {
    /// Type of the call ("log", "debug", "error", "table", ...).
    #[serde(rename = "type")]
    pub call_type: String,
    /// Call arguments.
    pub args: Vec<RemoteObject>,
    /// Identifier of the context where the call was made.
    pub execution_context_id: ExecutionContextId,
    /// Call timestamp (milliseconds since epoch).
    pub timestamp: f64,
    /// Stack trace captured when the call was made.
    pub stack_trace: Option<StackTrace>,
}

/// Event: Runtime.exceptionThrown
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionThrownEvent {
    /// Timestamp of the exception (milliseconds since epoch).
    pub timestamp: f64,
    /// Exception details.
    pub exception_details: ExceptionDetails,
}

#[cfg(test)]
mod tests;
