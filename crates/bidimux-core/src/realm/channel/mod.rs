//! Channel proxies: the script-to-client back-channel.
//!
//! A channel argument materialises a message queue inside the target realm
//! and hands the page its `sendMessage` function. The mediator pulls
//! messages with a long-poll `getMessage` loop and forwards each as a
//! `script.message` event.

use serde_json::json;
use tracing::{debug, trace, warn};

use bidimux_cdp::protocol::runtime::{
    CallArgument, CallFunctionOnParams, CallFunctionOnResult, EvaluateParams, EvaluateResult,
};

use crate::error::{Error, Result};
use crate::event::{EventManager, EventScope};
use crate::protocol::message::EventMessage;
use crate::protocol::script::{MessageParams, Source};
use crate::protocol::value::{
    ChannelProperties, ResultOwnership, SerializationOptions, ShadowTreeInclusion,
};

use super::Realm;

/// Self-invoking factory that builds the in-page queue.
///
/// `getMessage` parks on a promise while the queue is empty; `sendMessage`
/// pushes and wakes the parked reader. Both close over the queue, so the
/// handles work unbound.
pub(crate) const CHANNEL_FACTORY: &str = "(() => {\
 const queue = [];\
 let onMessage = null;\
 return {\
   async getMessage() {\
     if (queue.length === 0) {\
       await new Promise((resolve) => { onMessage = resolve; });\
     }\
     return queue.shift();\
   },\
   sendMessage(message) {\
     queue.push(message);\
     if (onMessage !== null) {\
       const resolve = onMessage;\
       onMessage = null;\
       resolve();\
     }\
   },\
 };\
})()";

/// A live channel inside one realm.
#[derive(Debug)]
pub struct ChannelProxy {
    channel_id: String,
    queue_handle: String,
    send_message_handle: String,
}

impl ChannelProxy {
    /// Materialise the channel in `realm` and start its message pump.
    ///
    /// # Errors
    ///
    /// `invalid argument` when the serialization options ask for DOM or
    /// shadow-tree serialization, which channels do not support; only
    /// `maxObjectDepth` is honoured.
    pub async fn init(
        realm: &Realm,
        event_manager: EventManager,
        event_scope: EventScope,
        properties: &ChannelProperties,
    ) -> Result<Self> {
        let options = properties.serialization_options.clone().unwrap_or_default();
        if options.max_dom_depth.is_some_and(|depth| depth != 0) {
            return Err(Error::invalid_argument(
                "maxDomDepth is not supported on channels",
            ));
        }
        if options
            .include_shadow_tree
            .is_some_and(|mode| mode != ShadowTreeInclusion::None)
        {
            return Err(Error::invalid_argument(
                "includeShadowTree is not supported on channels",
            ));
        }

        let queue_handle = Self::create_queue(realm).await?;
        let send_message_handle = Self::resolve_send_message(realm, &queue_handle).await?;

        let proxy = Self {
            channel_id: properties.channel.clone(),
            queue_handle,
            send_message_handle,
        };
        proxy.start_pump(realm.clone(), event_manager, event_scope, properties);
        Ok(proxy)
    }

    /// The handle of the `sendMessage` function passed to the script.
    pub fn send_message_handle(&self) -> &str {
        &self.send_message_handle
    }

    /// Attach to a queue that already exists in the realm under a global
    /// name; used for preload-script channels, whose queues are created
    /// by the injected source at document start.
    pub async fn connect(
        realm: &Realm,
        event_manager: EventManager,
        event_scope: EventScope,
        properties: &ChannelProperties,
        global_name: &str,
    ) -> Result<Self> {
        let result: EvaluateResult = realm
            .session()
            .send(
                "Runtime.evaluate",
                Some(EvaluateParams {
                    expression: format!("globalThis['{global_name}']"),
                    context_id: Some(realm.execution_context_id()),
                    return_by_value: Some(false),
                    ..Default::default()
                }),
            )
            .await
            .map_err(Error::from)?;
        let queue_handle = result
            .result
            .object_id
            .ok_or_else(|| Error::unknown(format!("Channel global '{global_name}' missing")))?;
        let send_message_handle = Self::resolve_send_message(realm, &queue_handle).await?;

        let proxy = Self {
            channel_id: properties.channel.clone(),
            queue_handle,
            send_message_handle,
        };
        proxy.start_pump(realm.clone(), event_manager, event_scope, properties);
        Ok(proxy)
    }

    async fn create_queue(realm: &Realm) -> Result<String> {
        let result: EvaluateResult = realm
            .session()
            .send(
                "Runtime.evaluate",
                Some(EvaluateParams {
                    expression: CHANNEL_FACTORY.to_string(),
                    context_id: Some(realm.execution_context_id()),
                    return_by_value: Some(false),
                    ..Default::default()
                }),
            )
            .await
            .map_err(Error::from)?;
        result
            .result
            .object_id
            .ok_or_else(|| Error::unknown("Channel factory returned no object"))
    }

    async fn resolve_send_message(realm: &Realm, queue_handle: &str) -> Result<String> {
        let result: CallFunctionOnResult = realm
            .session()
            .send(
                "Runtime.callFunctionOn",
                Some(CallFunctionOnParams {
                    function_declaration: "(channel) => channel.sendMessage".to_string(),
                    arguments: Some(vec![CallArgument::from_object_id(queue_handle)]),
                    return_by_value: Some(false),
                    execution_context_id: Some(realm.execution_context_id()),
                    ..Default::default()
                }),
            )
            .await
            .map_err(Error::from)?;
        result
            .result
            .object_id
            .ok_or_else(|| Error::unknown("Channel sendMessage handle missing"))
    }

    /// Pull messages until the realm's target goes away.
    fn start_pump(
        &self,
        realm: Realm,
        event_manager: EventManager,
        event_scope: EventScope,
        properties: &ChannelProperties,
    ) {
        let channel_id = self.channel_id.clone();
        let queue_handle = self.queue_handle.clone();
        let options = properties.serialization_options.clone().unwrap_or_default();
        let ownership = properties.ownership.unwrap_or(ResultOwnership::None);

        tokio::spawn(async move {
            debug!(channel = %channel_id, realm = %realm.id(), "Channel pump started");
            loop {
                let pulled: std::result::Result<CallFunctionOnResult, bidimux_cdp::CdpError> =
                    realm
                        .session()
                        .send(
                            "Runtime.callFunctionOn",
                            Some(CallFunctionOnParams {
                                function_declaration: "(channel) => channel.getMessage()"
                                    .to_string(),
                                arguments: Some(vec![CallArgument::from_object_id(
                                    queue_handle.clone(),
                                )]),
                                await_promise: Some(true),
                                return_by_value: Some(false),
                                execution_context_id: Some(realm.execution_context_id()),
                                serialization_options: Some(Realm::cdp_serialization_options(
                                    &SerializationOptions {
                                        max_object_depth: options.max_object_depth,
                                        ..SerializationOptions::default()
                                    },
                                )),
                                ..Default::default()
                            }),
                        )
                        .await;

                let result = match pulled {
                    Ok(result) => result,
                    Err(err) if err.is_target_closed() => {
                        debug!(channel = %channel_id, "Channel pump stopped: target closed");
                        break;
                    }
                    Err(err) => {
                        warn!(channel = %channel_id, error = %err, "Channel pump failed");
                        break;
                    }
                };
                if let Some(details) = result.exception_details {
                    warn!(channel = %channel_id, text = %details.text, "getMessage threw");
                    break;
                }

                let data = realm.serialize_for_client(&result.result, ownership).await;
                trace!(channel = %channel_id, "Channel message pulled");
                let params = MessageParams {
                    channel: channel_id.clone(),
                    data,
                    source: Source {
                        realm: realm.id().to_string(),
                        context: event_scope.context.clone(),
                    },
                };
                event_manager
                    .register_event(
                        EventMessage::new("script.message", json!(params)),
                        event_scope.clone(),
                    )
                    .await;
            }
        });
    }
}
