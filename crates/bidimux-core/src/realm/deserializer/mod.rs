//! BiDi local values to CDP call arguments.
//!
//! Primitives map directly or through `unserializableValue` spellings;
//! containers are rebuilt inside the target realm by calling a small
//! factory function with the flattened, already-deserialized pieces;
//! references resolve through handles or shared ids.

use serde_json::{Value, json};

use bidimux_cdp::protocol::dom::{ResolveNodeParams, ResolveNodeResult};
use bidimux_cdp::protocol::runtime::{CallArgument, CallFunctionOnParams};

use crate::error::{Error, ErrorCode, Result};
use crate::event::EventManager;
use crate::protocol::value::{
    ArgumentValue, EntryKey, JsNumber, LocalValue, RemoteReference,
};

use super::Realm;
use super::channel::ChannelProxy;
use super::shared_id::SharedId;

/// Factory that rebuilds an array from its elements.
const ARRAY_FACTORY: &str = "(...args) => args";
/// Factory that rebuilds a Set from its elements.
const SET_FACTORY: &str = "(...args) => new Set(args)";
/// Factory that rebuilds a Map from flattened key/value arguments.
const MAP_FACTORY: &str = "(...args) => {\
 const result = new Map();\
 for (let i = 0; i < args.length; i += 2) result.set(args[i], args[i + 1]);\
 return result;\
}";
/// Factory that rebuilds a plain object from flattened key/value arguments.
const OBJECT_FACTORY: &str = "(...args) => {\
 const result = {};\
 for (let i = 0; i < args.length; i += 2) result[args[i]] = args[i + 1];\
 return result;\
}";

/// Everything a deserialization pass needs from its surroundings.
pub struct DeserializationContext<'a> {
    /// The realm the value is being rebuilt in.
    pub realm: &'a Realm,
    /// Event manager for channel arguments.
    pub event_manager: &'a EventManager,
    /// Event scope used by `script.message` events of channel arguments.
    pub event_scope: crate::event::EventScope,
}

/// Deserialize one argument position.
pub async fn deserialize_argument(
    ctx: &DeserializationContext<'_>,
    value: &ArgumentValue,
) -> Result<CallArgument> {
    match value {
        ArgumentValue::Reference(reference) => deserialize_reference(ctx, reference).await,
        ArgumentValue::Local(local) => deserialize_local(ctx, local).await,
    }
}

async fn deserialize_reference(
    ctx: &DeserializationContext<'_>,
    reference: &RemoteReference,
) -> Result<CallArgument> {
    match reference {
        RemoteReference::Object { handle } => Ok(CallArgument::from_object_id(handle.clone())),
        RemoteReference::Shared { shared_id, .. } => {
            let parsed = SharedId::parse(shared_id)?;
            // A shared id from another document does not resolve here.
            if ctx.realm.browsing_context_id() != Some(parsed.navigable_id.as_str()) {
                return Err(Error::new(
                    ErrorCode::NoSuchNode,
                    format!("SharedId '{shared_id}' belongs to a different document"),
                ));
            }

            let result: ResolveNodeResult = ctx
                .realm
                .session()
                .send(
                    "DOM.resolveNode",
                    Some(ResolveNodeParams {
                        backend_node_id: Some(parsed.backend_node_id),
                        execution_context_id: Some(ctx.realm.execution_context_id()),
                    }),
                )
                .await
                .map_err(|err| {
                    if err.protocol_message_contains("No node with given id found") {
                        Error::new(
                            ErrorCode::NoSuchNode,
                            format!("Unable to find node with sharedId '{shared_id}'"),
                        )
                    } else {
                        Error::from(err)
                    }
                })?;

            match result.object.object_id {
                Some(object_id) => Ok(CallArgument::from_object_id(object_id)),
                None => Err(Error::new(
                    ErrorCode::NoSuchNode,
                    format!("Unable to find node with sharedId '{shared_id}'"),
                )),
            }
        }
    }
}

async fn deserialize_local(
    ctx: &DeserializationContext<'_>,
    local: &LocalValue,
) -> Result<CallArgument> {
    let argument = match local {
        LocalValue::Undefined => CallArgument::unserializable("undefined"),
        LocalValue::Null => CallArgument::from_value(Value::Null),
        LocalValue::String { value } => CallArgument::from_value(json!(value)),
        LocalValue::Boolean { value } => CallArgument::from_value(json!(value)),
        LocalValue::Number { value } => match value {
            JsNumber::Finite(number) => CallArgument::from_value(json!(number)),
            JsNumber::Special(special) => CallArgument::unserializable(special.js_repr()),
        },
        LocalValue::Bigint { value } => CallArgument::unserializable(format!("{value}n")),
        LocalValue::Date { value } => CallArgument::unserializable(format!(
            "new Date(Date.parse({}))",
            json!(value)
        )),
        LocalValue::Regexp { value } => {
            let flags = value.flags.clone().unwrap_or_default();
            CallArgument::unserializable(format!(
                "new RegExp({}, {})",
                json!(value.pattern),
                json!(flags)
            ))
        }
        LocalValue::Array { value } => {
            let mut elements = Vec::with_capacity(value.len());
            for element in value {
                elements.push(Box::pin(deserialize_argument(ctx, element)).await?);
            }
            build_container(ctx, ARRAY_FACTORY, elements).await?
        }
        LocalValue::Set { value } => {
            let mut elements = Vec::with_capacity(value.len());
            for element in value {
                elements.push(Box::pin(deserialize_argument(ctx, element)).await?);
            }
            build_container(ctx, SET_FACTORY, elements).await?
        }
        LocalValue::Map { value } => {
            let flattened = flatten_entries(ctx, value, true).await?;
            build_container(ctx, MAP_FACTORY, flattened).await?
        }
        LocalValue::Object { value } => {
            let flattened = flatten_entries(ctx, value, false).await?;
            build_container(ctx, OBJECT_FACTORY, flattened).await?
        }
        LocalValue::Channel { value } => {
            let proxy = ChannelProxy::init(
                ctx.realm,
                ctx.event_manager.clone(),
                ctx.event_scope.clone(),
                value,
            )
            .await?;
            CallArgument::from_object_id(proxy.send_message_handle().to_string())
        }
    };
    Ok(argument)
}

/// Flatten [key, value] entries into alternating factory arguments.
///
/// Maps accept arbitrary serialized keys; plain objects coerce every key
/// to a string.
async fn flatten_entries(
    ctx: &DeserializationContext<'_>,
    entries: &[(EntryKey, ArgumentValue)],
    allow_value_keys: bool,
) -> Result<Vec<CallArgument>> {
    let mut flattened = Vec::with_capacity(entries.len() * 2);
    for (key, value) in entries {
        let key_argument = match key {
            EntryKey::String(plain) => CallArgument::from_value(json!(plain)),
            EntryKey::Value(local) if allow_value_keys => {
                Box::pin(deserialize_local(ctx, local)).await?
            }
            EntryKey::Value(local) => match local {
                LocalValue::String { value } => CallArgument::from_value(json!(value)),
                _ => {
                    return Err(Error::invalid_argument(
                        "Object keys must be strings",
                    ));
                }
            },
        };
        flattened.push(key_argument);
        flattened.push(Box::pin(deserialize_argument(ctx, value)).await?);
    }
    Ok(flattened)
}

/// Rebuild a container inside the realm and reference it by object id.
async fn build_container(
    ctx: &DeserializationContext<'_>,
    factory: &str,
    arguments: Vec<CallArgument>,
) -> Result<CallArgument> {
    let result: bidimux_cdp::protocol::runtime::CallFunctionOnResult = ctx
        .realm
        .session()
        .send(
            "Runtime.callFunctionOn",
            Some(CallFunctionOnParams {
                function_declaration: factory.to_string(),
                arguments: Some(arguments),
                return_by_value: Some(false),
                execution_context_id: Some(ctx.realm.execution_context_id()),
                ..Default::default()
            }),
        )
        .await
        .map_err(Error::from)?;

    if let Some(details) = result.exception_details {
        return Err(Error::unknown(format!(
            "Could not rebuild argument: {}",
            details.text
        )));
    }
    match result.result.object_id {
        Some(object_id) => Ok(CallArgument::from_object_id(object_id)),
        None => Err(Error::unknown("Container factory returned no object")),
    }
}

#[cfg(test)]
mod tests;
