//! script.* commands.

use std::time::Duration;

use serde_json::{Value, json};

use bidimux_cdp::protocol::page::{CreateIsolatedWorldParams, RemoveScriptToEvaluateOnNewDocumentParams};
use bidimux_cdp::protocol::runtime::CallArgument;

use crate::error::{Error, Result};
use crate::event::EventScope;
use crate::protocol::script::{
    AddPreloadScriptParams, AddPreloadScriptResult, CallFunctionParams, DisownParams,
    EvaluateParams, GetRealmsParams, GetRealmsResult, RealmInfo, RemovePreloadScriptParams,
};
use crate::protocol::value::{ArgumentValue, LocalValue, Target};
use crate::realm::Realm;
use crate::realm::deserializer::{DeserializationContext, deserialize_argument};
use crate::script::preload::PreloadScript;
use crate::session::BidiSession;

/// Resolve a script target to a live realm.
///
/// A context target without a sandbox awaits the context's default realm;
/// a sandbox target creates the isolated world on first use.
pub(crate) async fn resolve_realm(session: &BidiSession, target: &Target) -> Result<Realm> {
    match target {
        Target::Realm { realm } => session.inner().realms.lock().await.get(realm),
        Target::Context { context, sandbox } => {
            let context_ref = session.contexts().get(context).await?;
            match sandbox {
                None => {
                    let realm_id = context_ref.default_realm().await;
                    session.inner().realms.lock().await.get(&realm_id)
                }
                Some(sandbox) => {
                    if let Some(realm) = session
                        .inner()
                        .realms
                        .lock()
                        .await
                        .find_window_realm(context, Some(sandbox))
                    {
                        return Ok(realm);
                    }

                    let target_ref = context_ref.target().await;
                    target_ref.wait_unblocked().await?;
                    target_ref
                        .session()
                        .send_unit(
                            "Page.createIsolatedWorld",
                            Some(CreateIsolatedWorldParams {
                                frame_id: context.clone(),
                                world_name: Some(sandbox.clone()),
                                grant_universal_access: Some(true),
                            }),
                        )
                        .await
                        .map_err(Error::from)?;

                    // The realm registers through the execution-context
                    // event; wait for it to land.
                    for _ in 0..400 {
                        if let Some(realm) = session
                            .inner()
                            .realms
                            .lock()
                            .await
                            .find_window_realm(context, Some(sandbox))
                        {
                            return Ok(realm);
                        }
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                    Err(Error::unknown(format!(
                        "Sandbox '{sandbox}' did not produce a realm"
                    )))
                }
            }
        }
    }
}

fn scope_for_realm(realm: &Realm) -> EventScope {
    EventScope {
        context: realm.browsing_context_id().map(str::to_string),
        top_level_context: None,
        user_context: None,
    }
}

/// script.getRealms
pub async fn get_realms(session: &BidiSession, params: GetRealmsParams) -> Result<Value> {
    if let Some(context) = &params.context {
        session.contexts().get(context).await?;
    }
    let realms = session
        .inner()
        .realms
        .lock()
        .await
        .realms(params.context.as_deref(), params.realm_type)
        .iter()
        .map(|realm| RealmInfo {
            realm: realm.id().to_string(),
            origin: realm.origin().to_string(),
            realm_type: realm.realm_type(),
            context: realm.browsing_context_id().map(str::to_string),
            sandbox: realm.sandbox().map(str::to_string),
        })
        .collect();
    Ok(json!(GetRealmsResult { realms }))
}

/// script.evaluate
pub async fn evaluate(session: &BidiSession, params: EvaluateParams) -> Result<Value> {
    let realm = resolve_realm(session, &params.target).await?;
    let result = realm
        .evaluate(
            &params.expression,
            params.await_promise,
            params.result_ownership.unwrap_or_default(),
            &params.serialization_options.unwrap_or_default(),
            params.user_activation.unwrap_or(false),
        )
        .await?;
    Ok(json!(result))
}

/// script.callFunction
pub async fn call_function(session: &BidiSession, params: CallFunctionParams) -> Result<Value> {
    let realm = resolve_realm(session, &params.target).await?;

    let event_scope = match realm.browsing_context_id() {
        Some(context) => session.scope_for_context(context).await,
        None => scope_for_realm(&realm),
    };
    let ctx = DeserializationContext {
        realm: &realm,
        event_manager: session.event_manager(),
        event_scope,
    };

    let this_arg: Option<CallArgument> = match &params.this {
        Some(this) => Some(deserialize_argument(&ctx, this).await?),
        None => None,
    };
    let mut arguments = Vec::new();
    for argument in params.arguments.as_deref().unwrap_or_default() {
        arguments.push(deserialize_argument(&ctx, argument).await?);
    }

    let result = realm
        .call_function(
            &params.function_declaration,
            this_arg,
            arguments,
            params.await_promise,
            params.result_ownership.unwrap_or_default(),
            &params.serialization_options.unwrap_or_default(),
            params.user_activation.unwrap_or(false),
        )
        .await?;
    Ok(json!(result))
}

/// script.disown
pub async fn disown(session: &BidiSession, params: DisownParams) -> Result<Value> {
    let realm = resolve_realm(session, &params.target).await?;
    for handle in &params.handles {
        realm.disown(handle).await;
    }
    Ok(json!({}))
}

/// script.addPreloadScript
pub async fn add_preload_script(
    session: &BidiSession,
    params: AddPreloadScriptParams,
) -> Result<Value> {
    if params.contexts.is_some() && params.user_contexts.is_some() {
        return Err(Error::invalid_argument(
            "'contexts' and 'userContexts' are mutually exclusive",
        ));
    }
    if let Some(contexts) = &params.contexts {
        for context in contexts {
            session.contexts().get_top_level(context).await?;
        }
    }
    if let Some(user_contexts) = &params.user_contexts {
        let storage = session.inner().user_contexts.lock().await;
        for user_context in user_contexts {
            storage.verify(user_context)?;
        }
    }

    // Preload arguments are restricted to channels; there is no realm to
    // deserialize anything else into at document start.
    let mut channels = Vec::new();
    for argument in params.arguments.as_deref().unwrap_or_default() {
        match argument {
            ArgumentValue::Local(LocalValue::Channel { value }) => channels.push(value.clone()),
            _ => {
                return Err(Error::invalid_argument(
                    "Preload script arguments must be channels",
                ));
            }
        }
    }

    let mut script = PreloadScript::new(
        params.function_declaration,
        channels,
        params.sandbox,
        params.contexts,
        params.user_contexts,
    );
    let source = script.wrapped_source();
    let sandbox = script.sandbox.clone();

    // Install on every live target the script applies to; future targets
    // pick it up during their init sequence.
    for context in session.contexts().top_level_contexts().await {
        if !script.applies_to(context.id(), context.user_context()) {
            continue;
        }
        let target = context.target().await;
        let result: bidimux_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentResult = target
            .session()
            .send(
                "Page.addScriptToEvaluateOnNewDocument",
                Some(
                    bidimux_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentParams {
                        source: source.clone(),
                        world_name: sandbox.clone(),
                        run_immediately: Some(true),
                    },
                ),
            )
            .await
            .map_err(Error::from)?;
        script
            .cdp_ids
            .insert(target.target_id().to_string(), result.identifier);
    }

    let id = session.inner().preload_scripts.lock().await.add(script);
    Ok(json!(AddPreloadScriptResult { script: id }))
}

/// script.removePreloadScript
pub async fn remove_preload_script(
    session: &BidiSession,
    params: RemovePreloadScriptParams,
) -> Result<Value> {
    let script = {
        let mut storage = session.inner().preload_scripts.lock().await;
        storage.remove(&params.script)?
    };

    for (target_id, cdp_id) in &script.cdp_ids {
        for target in session.all_targets().await {
            if target.target_id() != target_id {
                continue;
            }
            let result = target
                .session()
                .send_unit(
                    "Page.removeScriptToEvaluateOnNewDocument",
                    Some(RemoveScriptToEvaluateOnNewDocumentParams {
                        identifier: cdp_id.clone(),
                    }),
                )
                .await;
            if let Err(err) = result {
                if !err.is_target_closed() {
                    return Err(Error::from(err));
                }
            }
        }
    }
    Ok(json!({}))
}
