//! CDP event routing.
//!
//! One task per session observes the connection-wide CDP event stream and
//! routes each event to the owning browsing context, realm or network
//! request, emitting the translated BiDi events. Event handlers never
//! propagate failures; they log and drop.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use bidimux_cdp::CdpEvent;
use bidimux_cdp::CdpSession;
use bidimux_cdp::protocol::fetch::{AuthRequiredEvent, RequestPausedEvent};
use bidimux_cdp::protocol::network as cdp_network;
use bidimux_cdp::protocol::page as cdp_page;
use bidimux_cdp::protocol::runtime as cdp_runtime;
use bidimux_cdp::protocol::target_domain::{AttachedToTargetEvent, DetachedFromTargetEvent};

use crate::context::BrowsingContext;
use crate::event::EventScope;
use crate::network::pause_phase;
use crate::processor::emulation::apply_overrides_to_target;
use crate::protocol::browsing_context::{UserPromptClosed, UserPromptOpened};
use crate::protocol::log::{LogEntry, LogLevel};
use crate::protocol::message::EventMessage;
use crate::protocol::script::Source;
use crate::realm::channel::ChannelProxy;
use crate::realm::{Realm, RealmType};
use crate::script::preload::channel_global_name;
use crate::session::BidiSession;
use crate::session::user_contexts::UserContextStorage;
use crate::target::{CdpTarget, PreloadSpec};

/// Spawn the router task for a session.
pub fn start(session: BidiSession) {
    let mut events = session.inner().connection.subscribe_events();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "CDP event stream lagged");
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            };
            route(&session, &event).await;
        }
        debug!("CDP event router stopped");
    });
}

/// Route one CDP event; failures are contained here.
async fn route(session: &BidiSession, event: &CdpEvent) {
    let outcome = match event.method.as_str() {
        "Target.attachedToTarget" => on_attached(session, event).await,
        "Target.detachedFromTarget" => on_detached(session, event).await,

        "Page.frameAttached" => on_frame_attached(session, event).await,
        "Page.frameDetached" => on_frame_detached(session, event).await,
        "Page.frameStartedNavigating" => on_frame_started_navigating(session, event).await,
        "Page.frameNavigated" => on_frame_navigated(session, event).await,
        "Page.navigatedWithinDocument" => on_navigated_within_document(session, event).await,
        "Page.lifecycleEvent" => on_lifecycle_event(session, event).await,
        "Page.javascriptDialogOpening" => on_dialog_opening(session, event).await,
        "Page.javascriptDialogClosed" => on_dialog_closed(session, event).await,

        "Runtime.executionContextCreated" => on_execution_context_created(session, event).await,
        "Runtime.executionContextDestroyed" => {
            on_execution_context_destroyed(session, event).await
        }
        "Runtime.executionContextsCleared" => {
            on_execution_contexts_cleared(session, event).await
        }
        "Runtime.consoleAPICalled" => on_console_api_called(session, event).await,
        "Runtime.exceptionThrown" => on_exception_thrown(session, event).await,

        "Network.requestWillBeSent" => on_request_will_be_sent(session, event).await,
        "Network.requestWillBeSentExtraInfo" => on_request_extra_info(session, event).await,
        "Network.requestServedFromCache" => on_served_from_cache(session, event).await,
        "Network.responseReceived" => on_response_received(session, event).await,
        "Network.responseReceivedExtraInfo" => on_response_extra_info(session, event).await,
        "Network.loadingFinished" => on_loading_finished(session, event).await,
        "Network.loadingFailed" => on_loading_failed(session, event).await,

        "Fetch.requestPaused" => on_request_paused(session, event).await,
        "Fetch.authRequired" => on_auth_required(session, event).await,

        _ => Ok(()),
    };
    if let Err(message) = outcome {
        warn!(method = %event.method, error = %message, "CDP event handler failed");
    }
}

type RouteResult = std::result::Result<(), String>;

fn parse<T: serde::de::DeserializeOwned>(event: &CdpEvent) -> std::result::Result<T, String> {
    event
        .parse_params()
        .map_err(|e| format!("bad params: {e}"))
}

// =============================================================================
// Target lifecycle
// =============================================================================

async fn on_attached(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: AttachedToTargetEvent = parse(event)?;
    let info = &params.target_info;
    debug!(target = %info.target_id, kind = %info.target_type, session_id = %params.session_id, "Target attached");

    let user_context = UserContextStorage::user_context_id(info.browser_context_id.as_deref());
    let accept_insecure_certs = {
        let user_contexts = session.inner().user_contexts.lock().await;
        user_contexts
            .config(&user_context)
            .and_then(|config| config.accept_insecure_certs)
            .unwrap_or(false)
    };

    let client = CdpSession::attached(session.inner().connection.clone(), &params.session_id);
    let target = CdpTarget::with_type(
        &info.target_id,
        &info.target_type,
        client,
        session.browser().clone(),
        accept_insecure_certs,
    );
    session
        .inner()
        .targets
        .lock()
        .await
        .insert(params.session_id.clone(), target.clone());
    target.start_cdp_event_bridge(session.event_manager().clone());

    let page_like = matches!(info.target_type.as_str(), "page" | "tab" | "iframe");
    let mut created_context: Option<Arc<BrowsingContext>> = None;

    if page_like {
        if let Ok(existing) = session.contexts().get(&info.target_id).await {
            // An OOPiF moved into its own target; adopt it.
            existing.update_cdp_target(target.clone()).await;
        } else {
            let opener = info
                .opener_frame_id
                .clone()
                .or_else(|| info.opener_id.clone());
            let context = BrowsingContext::new(
                info.target_id.clone(),
                None,
                info.target_id.clone(),
                user_context.clone(),
                opener,
                info.url.clone(),
                target.clone(),
                session.event_manager().clone(),
            );
            session.contexts().add_context(context.clone()).await;
            created_context = Some(context);
        }
    }

    // Decide domain enablement and preload scripts before unblocking.
    let scope = match &created_context {
        Some(context) => context.event_scope(),
        None => EventScope::global(),
    };
    let network_wanted = session.network_module_wanted(&scope).await || {
        let network = session.inner().network.lock().await;
        network.collects_for(Some(info.target_id.as_str()), &user_context)
    };
    let preload = {
        let scripts = session.inner().preload_scripts.lock().await;
        scripts
            .scripts_for(&info.target_id, &user_context)
            .iter()
            .map(|script| PreloadSpec {
                script_id: script.id.clone(),
                source: script.wrapped_source(),
                sandbox: script.sandbox.clone(),
            })
            .collect::<Vec<_>>()
    };

    let installed = target.initialize(network_wanted, preload).await;
    {
        let mut scripts = session.inner().preload_scripts.lock().await;
        for (script_id, cdp_id) in installed {
            scripts.record_cdp_id(&script_id, info.target_id.as_str(), cdp_id);
        }
    }

    // Reconcile cross-target state on the fresh target.
    let (patterns, handle_auth) = {
        let network = session.inner().network.lock().await;
        network.fetch_wanted()
    };
    if !patterns.is_empty() || handle_auth {
        if let Err(err) = target.fetch_apply(patterns, handle_auth).await {
            if !err.is_target_closed() {
                warn!(error = %err, "Fetch reconciliation on new target failed");
            }
        }
    }
    let cache_disabled = {
        let network = session.inner().network.lock().await;
        network.default_cache_behavior() == crate::protocol::network::CacheBehavior::Bypass
    };
    if cache_disabled {
        let _ = target
            .session()
            .send_unit(
                "Network.setCacheDisabled",
                Some(cdp_network::SetCacheDisabledParams {
                    cache_disabled: true,
                }),
            )
            .await;
    }
    apply_overrides_to_target(session, &user_context, &target).await;

    // Parents surface before children: the created event waits for the
    // unblock latch that gates every command on this target.
    if let Some(context) = created_context {
        emit_context_created(session, &context).await;
    }
    Ok(())
}

async fn on_detached(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: DetachedFromTargetEvent = parse(event)?;
    debug!(session_id = %params.session_id, "Target detached");

    let target = session
        .inner()
        .targets
        .lock()
        .await
        .remove(&params.session_id);

    // Contexts backed by the detached target go away with it.
    if let Some(target) = &target {
        if let Some(context) = session.contexts().find_by_target(target.target_id()).await {
            let removed = session.contexts().delete_context(context.id()).await;
            for context in &removed {
                emit_context_destroyed(session, context).await;
            }
            for context in &removed {
                destroy_realms_of_context(session, context.id()).await;
            }
        }
    }

    let removed_realms = session
        .inner()
        .realms
        .lock()
        .await
        .remove_for_session(Some(&params.session_id));
    for realm in removed_realms {
        emit_realm_destroyed(session, &realm).await;
    }

    session
        .inner()
        .network
        .lock()
        .await
        .dispose_for_session(&params.session_id);
    Ok(())
}

// =============================================================================
// Frame tree
// =============================================================================

async fn context_for_frame(
    session: &BidiSession,
    frame_id: &str,
) -> std::result::Result<Arc<BrowsingContext>, String> {
    session
        .contexts()
        .get(frame_id)
        .await
        .map_err(|_| format!("unknown frame '{frame_id}'"))
}

async fn on_frame_attached(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::FrameAttachedEvent = parse(event)?;
    let Ok(parent) = session.contexts().get(&params.parent_frame_id).await else {
        // The parent may live on another target; its own session will
        // report the subtree.
        return Ok(());
    };

    let context = BrowsingContext::new(
        params.frame_id.clone(),
        Some(parent.id().to_string()),
        parent.top_level_id().to_string(),
        parent.user_context().to_string(),
        None,
        "about:blank",
        parent.target().await,
        session.event_manager().clone(),
    );
    session.contexts().add_context(context.clone()).await;
    emit_context_created(session, &context).await;
    Ok(())
}

async fn on_frame_detached(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::FrameDetachedEvent = parse(event)?;
    // Swaps move the frame to its own OOPiF target; the context survives.
    if params.reason.as_deref() == Some("swap") {
        return Ok(());
    }
    let removed = session.contexts().delete_context(&params.frame_id).await;
    for context in &removed {
        emit_context_destroyed(session, context).await;
    }
    for context in &removed {
        destroy_realms_of_context(session, context.id()).await;
    }
    Ok(())
}

async fn on_frame_started_navigating(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::FrameStartedNavigatingEvent = parse(event)?;
    let context = context_for_frame(session, &params.frame_id).await?;
    context
        .on_frame_started_navigating(&params.loader_id, &params.url)
        .await;
    Ok(())
}

async fn on_frame_navigated(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::FrameNavigatedEvent = parse(event)?;
    let Ok(context) = session.contexts().get(&params.frame.id).await else {
        trace!(frame = %params.frame.id, "Navigation in unknown frame");
        return Ok(());
    };
    context
        .on_frame_navigated(&params.frame.loader_id, &params.frame.url)
        .await;
    Ok(())
}

async fn on_navigated_within_document(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::NavigatedWithinDocumentEvent = parse(event)?;
    let context = context_for_frame(session, &params.frame_id).await?;
    context
        .on_navigated_within_document(&params.url, params.navigation_type.as_deref())
        .await;
    Ok(())
}

async fn on_lifecycle_event(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::LifecycleEventEvent = parse(event)?;
    if params.name != "DOMContentLoaded" && params.name != "load" {
        return Ok(());
    }
    let Ok(context) = session.contexts().get(&params.frame_id).await else {
        return Ok(());
    };
    context
        .on_lifecycle_event(&params.name, &params.loader_id)
        .await;
    Ok(())
}

// =============================================================================
// User prompts
// =============================================================================

/// The top-level context shown by the session a dialog event arrived on.
async fn context_for_session(
    session: &BidiSession,
    session_id: Option<&str>,
) -> Option<Arc<BrowsingContext>> {
    for context in session.contexts().top_level_contexts().await {
        if context.target().await.session_id() == session_id {
            return Some(context);
        }
    }
    None
}

fn prompt_type_name(dialog_type: cdp_page::DialogType) -> &'static str {
    match dialog_type {
        cdp_page::DialogType::Alert => "alert",
        cdp_page::DialogType::Confirm => "confirm",
        cdp_page::DialogType::Prompt => "prompt",
        cdp_page::DialogType::Beforeunload => "beforeunload",
    }
}

async fn on_dialog_opening(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::JavascriptDialogOpeningEvent = parse(event)?;
    let Some(context) = context_for_session(session, event.session_id.as_deref()).await else {
        return Err("dialog on unknown session".to_string());
    };
    context.set_last_prompt(params.dialog_type).await;

    let payload = UserPromptOpened {
        context: context.id().to_string(),
        // Prompts stay open for browsingContext.handleUserPrompt.
        handler: "ignore".to_string(),
        message: params.message,
        prompt_type: prompt_type_name(params.dialog_type).to_string(),
        default_value: params.default_prompt,
    };
    session
        .event_manager()
        .register_event(
            EventMessage::new("browsingContext.userPromptOpened", json!(payload)),
            context.event_scope(),
        )
        .await;
    Ok(())
}

async fn on_dialog_closed(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_page::JavascriptDialogClosedEvent = parse(event)?;
    let Some(context) = context_for_session(session, event.session_id.as_deref()).await else {
        return Err("dialog on unknown session".to_string());
    };

    let prompt_type = context
        .last_prompt()
        .await
        .map_or("alert", prompt_type_name);
    let payload = UserPromptClosed {
        context: context.id().to_string(),
        accepted: params.result,
        prompt_type: prompt_type.to_string(),
        user_text: (prompt_type == "prompt" && params.result)
            .then_some(params.user_input.clone()),
    };
    session
        .event_manager()
        .register_event(
            EventMessage::new("browsingContext.userPromptClosed", json!(payload)),
            context.event_scope(),
        )
        .await;
    Ok(())
}

// =============================================================================
// Realms
// =============================================================================

async fn emit_realm_created(session: &BidiSession, realm: &Realm) {
    let scope = match realm.browsing_context_id() {
        Some(context) => session.scope_for_context(context).await,
        None => EventScope::global(),
    };
    let mut payload = json!({
        "realm": realm.id(),
        "origin": realm.origin(),
        "type": realm.realm_type(),
    });
    if let Some(context) = realm.browsing_context_id() {
        payload["context"] = json!(context);
    }
    if let Some(sandbox) = realm.sandbox() {
        payload["sandbox"] = json!(sandbox);
    }
    session
        .event_manager()
        .register_event(EventMessage::new("script.realmCreated", payload), scope)
        .await;
}

async fn emit_realm_destroyed(session: &BidiSession, realm: &Realm) {
    // Root-owned handles die with the realm.
    for handle in realm.take_known_handles() {
        realm.release_object(&handle).await;
    }
    let scope = match realm.browsing_context_id() {
        Some(context) => session.scope_for_context(context).await,
        None => EventScope::global(),
    };
    session
        .event_manager()
        .register_event(
            EventMessage::new("script.realmDestroyed", json!({"realm": realm.id()})),
            scope,
        )
        .await;
}

async fn destroy_realms_of_context(session: &BidiSession, context_id: &str) {
    let removed = session
        .inner()
        .realms
        .lock()
        .await
        .remove_for_context(context_id);
    for realm in removed {
        emit_realm_destroyed(session, &realm).await;
    }
}

fn worker_realm_type(target_type: &str) -> RealmType {
    match target_type {
        "worker" => RealmType::DedicatedWorker,
        "shared_worker" => RealmType::SharedWorker,
        "service_worker" => RealmType::ServiceWorker,
        "paint_worklet" => RealmType::PaintWorklet,
        "audio_worklet" => RealmType::AudioWorklet,
        "worklet" => RealmType::Worklet,
        _ => RealmType::Worker,
    }
}

async fn on_execution_context_created(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_runtime::ExecutionContextCreatedEvent = parse(event)?;
    let description = params.context;
    let session_id = event.session_id.as_deref();
    let Some(target) = session
        .target_for_session(session_id.unwrap_or_default())
        .await
    else {
        return Ok(());
    };

    let aux = description.aux_data.as_ref();
    let frame_id = aux.and_then(|aux| aux.frame_id.clone());
    let is_default = aux.and_then(|aux| aux.is_default).unwrap_or(false);
    let context_type = aux.and_then(|aux| aux.context_type.clone());

    let realm = match (&frame_id, context_type.as_deref()) {
        (Some(frame_id), Some("default")) | (Some(frame_id), None) if is_default => Realm::new(
            RealmType::Window,
            Some(frame_id.clone()),
            description.id,
            description.origin.clone(),
            None,
            target.session().clone(),
        ),
        (Some(frame_id), Some("isolated")) => Realm::new(
            RealmType::Window,
            Some(frame_id.clone()),
            description.id,
            description.origin.clone(),
            Some(description.name.clone()),
            target.session().clone(),
        ),
        (Some(_), _) => return Ok(()),
        (None, _) => Realm::new(
            worker_realm_type(target.target_type()),
            None,
            description.id,
            description.origin.clone(),
            None,
            target.session().clone(),
        ),
    };

    let realm_id = realm.id().to_string();
    session.inner().realms.lock().await.add(realm.clone());

    if realm.realm_type() == RealmType::Window && realm.sandbox().is_none() {
        if let Some(frame_id) = &frame_id {
            if let Ok(context) = session.contexts().get(frame_id).await {
                context.set_default_realm(&realm_id).await;
            }
        }
        // Preload channels of this document are live now; attach pumps.
        attach_preload_channels(session, &realm).await;
    }

    emit_realm_created(session, &realm).await;
    Ok(())
}

/// Attach channel pumps for preload scripts that apply to the realm's
/// context.
async fn attach_preload_channels(session: &BidiSession, realm: &Realm) {
    let Some(context_id) = realm.browsing_context_id() else {
        return;
    };
    let Ok(context) = session.contexts().get(context_id).await else {
        return;
    };
    let scripts = {
        let storage = session.inner().preload_scripts.lock().await;
        storage.scripts_for(context.top_level_id(), context.user_context())
    };

    for script in scripts {
        for (index, properties) in script.channels.iter().enumerate() {
            let global = channel_global_name(&script.id, index);
            let result = ChannelProxy::connect(
                realm,
                session.event_manager().clone(),
                context.event_scope(),
                properties,
                &global,
            )
            .await;
            if let Err(err) = result {
                trace!(script = %script.id, error = %err, "Preload channel attach failed");
            }
        }
    }
}

async fn on_execution_context_destroyed(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_runtime::ExecutionContextDestroyedEvent = parse(event)?;
    let removed = session
        .inner()
        .realms
        .lock()
        .await
        .remove_by_execution_context(event.session_id.as_deref(), params.execution_context_id);
    if let Some(realm) = removed {
        emit_realm_destroyed(session, &realm).await;
    }
    Ok(())
}

async fn on_execution_contexts_cleared(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let removed = session
        .inner()
        .realms
        .lock()
        .await
        .remove_for_session(event.session_id.as_deref());
    for realm in &removed {
        if let Some(context_id) = realm.browsing_context_id() {
            if let Ok(context) = session.contexts().get(context_id).await {
                context.clear_default_realm().await;
            }
        }
    }
    for realm in removed {
        emit_realm_destroyed(session, &realm).await;
    }
    Ok(())
}

// =============================================================================
// Log entries
// =============================================================================

fn console_level(method: &str) -> LogLevel {
    match method {
        "debug" | "trace" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" | "assert" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn stack_trace_json(stack: Option<&cdp_runtime::StackTrace>) -> Option<Value> {
    stack.map(|stack| {
        json!({
            "callFrames": stack
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
                .collect::<Vec<_>>()
        })
    })
}

async fn on_console_api_called(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_runtime::ConsoleApiCalledEvent = parse(event)?;
    let realm = session
        .inner()
        .realms
        .lock()
        .await
        .find_by_execution_context(event.session_id.as_deref(), params.execution_context_id);
    let Some(realm) = realm else {
        return Ok(());
    };

    let scope = match realm.browsing_context_id() {
        Some(context) => session.scope_for_context(context).await,
        None => EventScope::global(),
    };
    if !session
        .event_manager()
        .has_listeners("log.entryAdded", &scope)
        .await
    {
        return Ok(());
    }

    let mut args = Vec::with_capacity(params.args.len());
    let mut rendered = Vec::with_capacity(params.args.len());
    for arg in &params.args {
        rendered.push(render_console_arg(arg));
        args.push(realm.serialize_cdp_object(arg).await);
    }

    let entry = LogEntry {
        entry_type: "console".to_string(),
        level: console_level(&params.call_type),
        source: Source {
            realm: realm.id().to_string(),
            context: realm.browsing_context_id().map(str::to_string),
        },
        text: Some(rendered.join(" ")),
        timestamp: params.timestamp as u64,
        args: Some(args),
        method: Some(params.call_type.clone()),
        stack_trace: stack_trace_json(params.stack_trace.as_ref()),
    };
    session
        .event_manager()
        .register_event(EventMessage::new("log.entryAdded", json!(entry)), scope)
        .await;
    Ok(())
}

/// Human-readable form of one console argument, for the entry text.
fn render_console_arg(arg: &cdp_runtime::RemoteObject) -> String {
    if let Some(Value::String(text)) = &arg.value {
        return text.clone();
    }
    if let Some(value) = &arg.value {
        return value.to_string();
    }
    if let Some(unserializable) = &arg.unserializable_value {
        return unserializable.clone();
    }
    arg.description.clone().unwrap_or_default()
}

async fn on_exception_thrown(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_runtime::ExceptionThrownEvent = parse(event)?;
    let details = params.exception_details;
    let Some(execution_context_id) = details.execution_context_id else {
        return Ok(());
    };
    let realm = session
        .inner()
        .realms
        .lock()
        .await
        .find_by_execution_context(event.session_id.as_deref(), execution_context_id);
    let Some(realm) = realm else {
        return Ok(());
    };

    let scope = match realm.browsing_context_id() {
        Some(context) => session.scope_for_context(context).await,
        None => EventScope::global(),
    };

    let text = details
        .exception
        .as_ref()
        .and_then(|e| e.description.clone())
        .unwrap_or_else(|| details.text.clone());
    let entry = LogEntry {
        entry_type: "javascript".to_string(),
        level: LogLevel::Error,
        source: Source {
            realm: realm.id().to_string(),
            context: realm.browsing_context_id().map(str::to_string),
        },
        text: Some(text),
        timestamp: params.timestamp as u64,
        args: None,
        method: None,
        stack_trace: stack_trace_json(details.stack_trace.as_ref()),
    };
    session
        .event_manager()
        .register_event(EventMessage::new("log.entryAdded", json!(entry)), scope)
        .await;
    Ok(())
}

// =============================================================================
// Network
// =============================================================================

async fn emit_network_events(
    session: &BidiSession,
    context_id: Option<String>,
    events: Vec<EventMessage>,
) {
    let scope = match context_id {
        Some(context_id) => session.scope_for_context(&context_id).await,
        None => EventScope::global(),
    };
    for event in events {
        session
            .event_manager()
            .register_event(event, scope.clone())
            .await;
    }
}

async fn on_request_will_be_sent(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::RequestWillBeSentEvent = parse(event)?;

    let context_id = params.frame_id.clone();
    let navigation = match &context_id {
        Some(context_id) => match session.contexts().get(context_id).await {
            Ok(context) => context.navigation_for_loader(&params.loader_id).await,
            Err(_) => None,
        },
        None => None,
    };

    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request = network.request_mut(
            &params.request_id,
            context_id,
            event.session_id.clone(),
        );
        let events = request.on_request_will_be_sent(params, navigation);
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_request_extra_info(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::RequestWillBeSentExtraInfoEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request =
            network.request_mut(&params.request_id, None, event.session_id.clone());
        let events = request.on_request_extra_info(params);
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_served_from_cache(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::RequestServedFromCacheEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        match network.existing_request_mut(&params.request_id) {
            Some(request) => {
                let events = request.on_served_from_cache();
                (request.context_id().map(str::to_string), events)
            }
            None => return Ok(()),
        }
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_response_received(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::ResponseReceivedEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request = network.request_mut(
            &params.request_id,
            params.frame_id.clone(),
            event.session_id.clone(),
        );
        let events = request.on_response_received(params);
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_response_extra_info(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::ResponseReceivedExtraInfoEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request =
            network.request_mut(&params.request_id, None, event.session_id.clone());
        let events = request.on_response_extra_info(params);
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_loading_finished(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::LoadingFinishedEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        match network.existing_request_mut(&params.request_id) {
            Some(request) => {
                let events = request.on_loading_finished();
                (request.context_id().map(str::to_string), events)
            }
            None => return Ok(()),
        }
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

async fn on_loading_failed(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: cdp_network::LoadingFailedEvent = parse(event)?;
    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        match network.existing_request_mut(&params.request_id) {
            Some(request) => {
                let events = request.on_loading_failed(&params.error_text);
                (request.context_id().map(str::to_string), events)
            }
            None => return Ok(()),
        }
    };

    // Navigation requests share their id with the loader; a failing one
    // fails the navigation.
    if let Some(context_id) = &context_id {
        if let Ok(context) = session.contexts().get(context_id).await {
            if context
                .navigation_for_loader(&params.request_id)
                .await
                .is_some()
            {
                context
                    .on_loading_failed(&params.request_id, &params.error_text)
                    .await;
            }
        }
    }

    emit_network_events(session, context_id, events).await;
    Ok(())
}

// =============================================================================
// Fetch interception
// =============================================================================

async fn on_request_paused(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: RequestPausedEvent = parse(event)?;
    let request_id = params
        .network_id
        .clone()
        .unwrap_or_else(|| params.request_id.clone());
    let phase = pause_phase(&params);

    let top_level = match session.contexts().get(&params.frame_id).await {
        Ok(context) => Some(context.top_level_id().to_string()),
        Err(_) => None,
    };
    let intercepts = {
        let network = session.inner().network.lock().await;
        network.matching_intercepts(phase, &params.request.url, top_level.as_deref())
    };

    if intercepts.is_empty() {
        // Nothing wants this pause; release it untouched.
        auto_continue(session, event.session_id.as_deref(), &params, phase).await;
        return Ok(());
    }

    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request = network.request_mut(
            &request_id,
            Some(params.frame_id.clone()),
            event.session_id.clone(),
        );
        let events = request.on_request_paused(&params, intercepts);
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

/// Continue a pause no intercept asked for.
async fn auto_continue(
    session: &BidiSession,
    session_id: Option<&str>,
    params: &RequestPausedEvent,
    phase: crate::protocol::network::InterceptPhase,
) {
    let Some(target) = session
        .target_for_session(session_id.unwrap_or_default())
        .await
    else {
        return;
    };

    use crate::protocol::network::InterceptPhase;
    let result = match phase {
        InterceptPhase::BeforeRequestSent => {
            target
                .session()
                .send_unit(
                    "Fetch.continueRequest",
                    Some(bidimux_cdp::protocol::fetch::ContinueRequestParams {
                        request_id: params.request_id.clone(),
                        ..Default::default()
                    }),
                )
                .await
        }
        InterceptPhase::ResponseStarted | InterceptPhase::AuthRequired => {
            target
                .session()
                .send_unit(
                    "Fetch.continueResponse",
                    Some(bidimux_cdp::protocol::fetch::ContinueResponseParams {
                        request_id: params.request_id.clone(),
                        ..Default::default()
                    }),
                )
                .await
        }
    };
    if let Err(err) = result {
        if !err.is_target_closed() {
            warn!(error = %err, "Auto-continue failed");
        }
    }
}

async fn on_auth_required(session: &BidiSession, event: &CdpEvent) -> RouteResult {
    let params: AuthRequiredEvent = parse(event)?;

    let top_level = match session.contexts().get(&params.frame_id).await {
        Ok(context) => Some(context.top_level_id().to_string()),
        Err(_) => None,
    };
    let intercepts = {
        let network = session.inner().network.lock().await;
        network.matching_intercepts(
            crate::protocol::network::InterceptPhase::AuthRequired,
            &params.request.url,
            top_level.as_deref(),
        )
    };

    if intercepts.is_empty() {
        // Let the browser show its own auth dialog.
        if let Some(target) = session
            .target_for_session(event.session_id.as_deref().unwrap_or_default())
            .await
        {
            let _ = target
                .session()
                .send_unit(
                    "Fetch.continueWithAuth",
                    Some(bidimux_cdp::protocol::fetch::ContinueWithAuthParams {
                        request_id: params.request_id.clone(),
                        auth_challenge_response:
                            bidimux_cdp::protocol::fetch::AuthChallengeResponse {
                                response: "Default".to_string(),
                                username: None,
                                password: None,
                            },
                    }),
                )
                .await;
        }
        return Ok(());
    }

    let (context_id, events) = {
        let mut network = session.inner().network.lock().await;
        let request = network.request_mut(
            &params.request_id,
            Some(params.frame_id.clone()),
            event.session_id.clone(),
        );
        let events = request.on_auth_required(
            &params.request_id,
            &params.auth_challenge.scheme,
            &params.auth_challenge.realm,
            intercepts,
        );
        (request.context_id().map(str::to_string), events)
    };
    emit_network_events(session, context_id, events).await;
    Ok(())
}

// =============================================================================
// Context events
// =============================================================================

async fn emit_context_created(session: &BidiSession, context: &Arc<BrowsingContext>) {
    let info = crate::protocol::browsing_context::Info {
        context: context.id().to_string(),
        url: context.url().await,
        user_context: context.user_context().to_string(),
        children: None,
        parent: context.parent_id().map(str::to_string),
        original_opener: context.original_opener().map(str::to_string),
        client_window: None,
    };
    session
        .event_manager()
        .register_event(
            EventMessage::new("browsingContext.contextCreated", json!(info)),
            context.event_scope(),
        )
        .await;
}

async fn emit_context_destroyed(session: &BidiSession, context: &Arc<BrowsingContext>) {
    let info = crate::protocol::browsing_context::Info {
        context: context.id().to_string(),
        url: context.url().await,
        user_context: context.user_context().to_string(),
        children: None,
        parent: context.parent_id().map(str::to_string),
        original_opener: context.original_opener().map(str::to_string),
        client_window: None,
    };
    session
        .event_manager()
        .register_event(
            EventMessage::new("browsingContext.contextDestroyed", json!(info)),
            context.event_scope(),
        )
        .await;
}
