//! Realms and the script value bridge.

pub mod channel;
pub mod deserializer;
pub mod serializer;
pub mod shared_id;
pub mod storage;

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};

use serde_json::{Value, json};
use tracing::{debug, trace};
use uuid::Uuid;

use bidimux_cdp::CdpSession;
use bidimux_cdp::protocol::runtime::{
    CallArgument, CallFunctionOnParams, EvaluateParams as CdpEvaluateParams, ExceptionDetails,
    ExecutionContextId, ReleaseObjectParams, RemoteObject, SerializationMode,
    SerializationOptions as CdpSerializationOptions,
};

use crate::error::{Error, Result};
use crate::protocol::script::EvaluateResult;
use crate::protocol::value::{ResultOwnership, SerializationOptions, ShadowTreeInclusion};

use serializer::serialize_remote_object;

/// Realm kinds, mirrored from the BiDi realm types.
pub use crate::protocol::script::RealmType;

/// One JavaScript execution context known to the mediator.
///
/// Cloning is cheap and clones share the known-handle set; the storage owns
/// the canonical copy.
#[derive(Debug, Clone)]
pub struct Realm {
    /// BiDi realm id, a fresh uuid.
    id: String,
    /// Kind of the realm.
    realm_type: RealmType,
    /// Owning browsing context, for window realms.
    browsing_context_id: Option<String>,
    /// Backing CDP execution context.
    execution_context_id: ExecutionContextId,
    /// Realm origin.
    origin: String,
    /// Sandbox name for isolated window realms.
    sandbox: Option<String>,
    /// Session of the owning target.
    session: CdpSession,
    /// Handles handed to the client with root ownership.
    known_handles: Arc<StdMutex<HashSet<String>>>,
}

impl Realm {
    /// Register a fresh realm.
    pub fn new(
        realm_type: RealmType,
        browsing_context_id: Option<String>,
        execution_context_id: ExecutionContextId,
        origin: impl Into<String>,
        sandbox: Option<String>,
        session: CdpSession,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            realm_type,
            browsing_context_id,
            execution_context_id,
            origin: origin.into(),
            sandbox,
            session,
            known_handles: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    /// BiDi realm id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Realm kind.
    pub fn realm_type(&self) -> RealmType {
        self.realm_type
    }

    /// Owning browsing context id, for window realms.
    pub fn browsing_context_id(&self) -> Option<&str> {
        self.browsing_context_id.as_deref()
    }

    /// Backing CDP execution context id.
    pub fn execution_context_id(&self) -> ExecutionContextId {
        self.execution_context_id
    }

    /// Realm origin.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Sandbox name, for isolated window realms.
    pub fn sandbox(&self) -> Option<&str> {
        self.sandbox.as_deref()
    }

    /// The CDP session the realm lives on.
    pub fn session(&self) -> &CdpSession {
        &self.session
    }

    /// Whether the client owns this handle in this realm.
    pub fn owns_handle(&self, handle: &str) -> bool {
        self.known_handles.lock().expect("handle set poisoned").contains(handle)
    }

    /// Record a handle handed out with root ownership.
    fn record_handle(&self, handle: &str) {
        self.known_handles
            .lock()
            .expect("handle set poisoned")
            .insert(handle.to_string());
    }

    /// Release a handle the client disowned; unknown handles are a no-op.
    pub async fn disown(&self, handle: &str) {
        let owned = self
            .known_handles
            .lock()
            .expect("handle set poisoned")
            .remove(handle);
        if owned {
            self.release_object(handle).await;
        } else {
            trace!(realm = %self.id, handle = %handle, "Disown of unowned handle ignored");
        }
    }

    /// All handles the client still owns, consumed on realm destruction.
    pub fn take_known_handles(&self) -> Vec<String> {
        self.known_handles
            .lock()
            .expect("handle set poisoned")
            .drain()
            .collect()
    }

    /// Fire-and-forget release of a CDP remote object.
    ///
    /// "Invalid remote object id" means the object is already gone and is
    /// swallowed, like every other failure here.
    pub async fn release_object(&self, object_id: &str) {
        let result = self
            .session
            .send_unit(
                "Runtime.releaseObject",
                Some(ReleaseObjectParams {
                    object_id: object_id.to_string(),
                }),
            )
            .await;
        if let Err(err) = result {
            trace!(realm = %self.id, error = %err, "releaseObject failed");
        }
    }

    /// CDP serialization options for this bridge crossing.
    pub(crate) fn cdp_serialization_options(
        options: &SerializationOptions,
    ) -> CdpSerializationOptions {
        let include_shadow_tree = match options.include_shadow_tree {
            None | Some(ShadowTreeInclusion::None) => "none",
            Some(ShadowTreeInclusion::Open) => "open",
            Some(ShadowTreeInclusion::All) => "all",
        };
        CdpSerializationOptions {
            serialization: SerializationMode::Deep,
            max_depth: options.max_object_depth,
            additional_parameters: Some(json!({
                "maxNodeDepth": options.max_dom_depth,
                "includeShadowTree": include_shadow_tree,
            })),
        }
    }

    /// Run `script.evaluate` inside this realm.
    pub async fn evaluate(
        &self,
        expression: &str,
        await_promise: bool,
        ownership: ResultOwnership,
        options: &SerializationOptions,
        user_activation: bool,
    ) -> Result<EvaluateResult> {
        let result: bidimux_cdp::protocol::runtime::EvaluateResult = self
            .session
            .send(
                "Runtime.evaluate",
                Some(CdpEvaluateParams {
                    expression: expression.to_string(),
                    context_id: Some(self.execution_context_id),
                    silent: None,
                    return_by_value: Some(false),
                    user_gesture: Some(user_activation),
                    await_promise: Some(await_promise),
                    serialization_options: Some(Self::cdp_serialization_options(options)),
                }),
            )
            .await
            .map_err(map_call_error)?;

        if let Some(details) = result.exception_details {
            // Plain evaluation adds no wrapper line.
            return Ok(self.exception_result(&details, 0).await);
        }
        self.success_result(result.result, ownership).await
    }

    /// Run `script.callFunction` inside this realm.
    ///
    /// The user function is wrapped in one extra source line, which the
    /// exception mapping compensates for.
    pub async fn call_function(
        &self,
        function_declaration: &str,
        this_arg: Option<CallArgument>,
        mut arguments: Vec<CallArgument>,
        await_promise: bool,
        ownership: ResultOwnership,
        options: &SerializationOptions,
        user_activation: bool,
    ) -> Result<EvaluateResult> {
        let wrapped = format!(
            "(...args) => {{\n  return ({function_declaration}).apply(args[0], args.slice(1));\n}}"
        );
        let mut all_arguments =
            vec![this_arg.unwrap_or_else(|| CallArgument::unserializable("undefined"))];
        all_arguments.append(&mut arguments);

        let result: bidimux_cdp::protocol::runtime::CallFunctionOnResult = self
            .session
            .send(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: wrapped,
                    object_id: None,
                    arguments: Some(all_arguments),
                    silent: None,
                    return_by_value: Some(false),
                    user_gesture: Some(user_activation),
                    await_promise: Some(await_promise),
                    execution_context_id: Some(self.execution_context_id),
                    serialization_options: Some(Self::cdp_serialization_options(options)),
                }),
            )
            .await
            .map_err(map_call_error)?;

        if let Some(details) = result.exception_details {
            // The wrapper adds one line above the user function.
            return Ok(self.exception_result(&details, 1).await);
        }
        self.success_result(result.result, ownership).await
    }

    /// Serialize a successful result, applying the handle ownership policy.
    async fn success_result(
        &self,
        object: RemoteObject,
        ownership: ResultOwnership,
    ) -> Result<EvaluateResult> {
        let value = self.serialize_for_client(&object, ownership).await;
        Ok(EvaluateResult::Success {
            result: value,
            realm: self.id.clone(),
        })
    }

    /// Serialize a CDP remote object into a BiDi remote value.
    ///
    /// With root ownership the handle is attached and recorded; otherwise
    /// the remote object is released fire-and-forget.
    pub async fn serialize_for_client(
        &self,
        object: &RemoteObject,
        ownership: ResultOwnership,
    ) -> Value {
        let mut value =
            serialize_remote_object(object, self.browsing_context_id.as_deref());

        match (&object.object_id, ownership) {
            (Some(object_id), ResultOwnership::Root) => {
                self.record_handle(object_id);
                if let Some(map) = value.as_object_mut() {
                    map.insert("handle".to_string(), json!(object_id));
                }
                debug!(realm = %self.id, handle = %object_id, "Handle handed to client");
            }
            (Some(object_id), ResultOwnership::None) => {
                self.release_object(object_id).await;
            }
            (None, _) => {}
        }
        value
    }

    /// Deep-serialize an arbitrary CDP remote object through the realm.
    ///
    /// Console arguments and exception values arrive without a deep form;
    /// an identity call with deep serialization requested produces one.
    pub async fn serialize_cdp_object(&self, object: &RemoteObject) -> Value {
        let argument = match (&object.object_id, &object.unserializable_value) {
            (Some(object_id), _) => CallArgument::from_object_id(object_id.clone()),
            (None, Some(unserializable)) => CallArgument::unserializable(unserializable.clone()),
            (None, None) => CallArgument::from_value(object.value.clone().unwrap_or(Value::Null)),
        };

        let result: std::result::Result<
            bidimux_cdp::protocol::runtime::CallFunctionOnResult,
            bidimux_cdp::CdpError,
        > = self
            .session
            .send(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: "(value) => value".to_string(),
                    arguments: Some(vec![argument]),
                    return_by_value: Some(false),
                    execution_context_id: Some(self.execution_context_id),
                    serialization_options: Some(Self::cdp_serialization_options(
                        &SerializationOptions::default(),
                    )),
                    ..Default::default()
                }),
            )
            .await;

        match result {
            Ok(result) => {
                serialize_remote_object(&result.result, self.browsing_context_id.as_deref())
            }
            Err(_) => serialize_remote_object(object, self.browsing_context_id.as_deref()),
        }
    }

    /// Map CDP exception details to a BiDi exception result.
    async fn exception_result(
        &self,
        details: &ExceptionDetails,
        line_offset: i64,
    ) -> EvaluateResult {
        let exception = match &details.exception {
            Some(object) => self.serialize_for_client(object, ResultOwnership::None).await,
            None => Value::Null,
        };
        let call_frames: Vec<Value> = details
            .stack_trace
            .as_ref()
            .map(|stack| {
                stack
                    .call_frames
                    .iter()
                    .map(|frame| {
                        json!({
                            "functionName": frame.function_name,
                            "lineNumber": frame.line_number,
                            "columnNumber": frame.column_number,
                            "url": frame.url,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        EvaluateResult::Exception {
            exception_details: json!({
                "exception": exception,
                "text": details.text,
                "lineNumber": details.line_number - line_offset,
                "columnNumber": details.column_number,
                "stackTrace": {"callFrames": call_frames},
            }),
            realm: self.id.clone(),
        }
    }
}

/// Map a Runtime.callFunctionOn/evaluate failure to a BiDi error.
fn map_call_error(err: bidimux_cdp::CdpError) -> Error {
    const NO_SUCH_HANDLE_MESSAGES: &[&str] = &[
        "Could not find object with given id",
        "Argument should belong to the same JavaScript world as target object",
        "Invalid remote object id",
    ];
    if err.protocol_code() == Some(-32000)
        && NO_SUCH_HANDLE_MESSAGES
            .iter()
            .any(|m| err.protocol_message_contains(m))
    {
        return Error::new(crate::error::ErrorCode::NoSuchHandle, "Handle not found");
    }
    Error::from(err)
}
