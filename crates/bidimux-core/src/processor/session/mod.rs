//! session.* commands.

use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::protocol::session::{
    EmptyParams, NewParams, NewResult, StatusResult, SubscribeResult, SubscriptionRequest,
    UnsubscribeByIdRequest, UnsubscribeRequest,
};
use crate::session::BidiSession;

/// session.status
pub async fn status(_session: &BidiSession, _params: EmptyParams) -> Result<Value> {
    // A single-client mediator: once a transport is attached, no further
    // session can be created.
    Ok(json!(StatusResult {
        ready: false,
        message: "already connected".to_string(),
    }))
}

/// session.new
pub async fn new_session(_session: &BidiSession, _params: NewParams) -> Result<Value> {
    Ok(json!(NewResult {
        session_id: Uuid::new_v4().to_string(),
        capabilities: json!({
            "acceptInsecureCerts": false,
            "setWindowRect": false,
        }),
    }))
}

/// session.end
pub async fn end(_session: &BidiSession, _params: EmptyParams) -> Result<Value> {
    // Transport teardown is the front-end's concern; there is nothing to
    // release at this layer.
    Ok(json!({}))
}

/// session.subscribe
pub async fn subscribe(session: &BidiSession, params: SubscriptionRequest) -> Result<Value> {
    let contexts = params.contexts.unwrap_or_default();
    let user_contexts = params.user_contexts.unwrap_or_default();

    // Scope targets must exist up front; subscribing to a dangling scope
    // must fail rather than silently never match. Child contexts resolve
    // to their top-level ancestor.
    let mut top_level = Vec::with_capacity(contexts.len());
    for context_id in &contexts {
        let ancestor = session.contexts().top_level_ancestor(context_id).await?;
        top_level.push(ancestor.id().to_string());
    }
    {
        let user_context_storage = session.inner().user_contexts.lock().await;
        for user_context in &user_contexts {
            user_context_storage.verify(user_context)?;
        }
    }

    let subscription = {
        let mut subscriptions = session.inner().subscriptions.lock().await;
        subscriptions.subscribe(&params.events, &top_level, &user_contexts, None)?
    };

    update_network_enablement(session).await;
    Ok(json!(SubscribeResult { subscription }))
}

/// session.unsubscribe (by attributes)
pub async fn unsubscribe(session: &BidiSession, params: UnsubscribeRequest) -> Result<Value> {
    let contexts = match &params.contexts {
        None => None,
        Some(contexts) => {
            let mut top_level = Vec::with_capacity(contexts.len());
            for context_id in contexts {
                let ancestor = session.contexts().top_level_ancestor(context_id).await?;
                top_level.push(ancestor.id().to_string());
            }
            Some(top_level)
        }
    };
    {
        let mut subscriptions = session.inner().subscriptions.lock().await;
        subscriptions.unsubscribe(&params.events, contexts.as_deref(), None)?;
    }
    update_network_enablement(session).await;
    Ok(json!({}))
}

/// session.unsubscribe (by subscription ids)
pub async fn unsubscribe_by_id(
    session: &BidiSession,
    params: UnsubscribeByIdRequest,
) -> Result<Value> {
    {
        let mut subscriptions = session.inner().subscriptions.lock().await;
        subscriptions.unsubscribe_by_id(&params.subscriptions)?;
    }
    update_network_enablement(session).await;
    Ok(json!({}))
}

/// Reconcile the per-target Network domain with what subscriptions and
/// data collectors currently want.
pub(crate) async fn update_network_enablement(session: &BidiSession) {
    let contexts = session.contexts().top_level_contexts().await;
    for context in contexts {
        let scope = context.event_scope();
        let wanted = session.network_module_wanted(&scope).await || {
            let network = session.inner().network.lock().await;
            network.collects_for(Some(context.id()), context.user_context())
        };
        let target = context.target().await;
        if let Err(err) = target.toggle_network_if_needed(wanted).await {
            if !err.is_target_closed() {
                warn!(target = %target.target_id(), error = %err, "Network toggle failed");
            }
        }
    }
}
