//! cdp.* commands: the raw-CDP escape hatch.

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::protocol::cdp::{
    GetSessionParams, GetSessionResult, ResolveRealmParams, ResolveRealmResult, SendCommandParams,
    SendCommandResult,
};
use crate::session::BidiSession;

/// cdp.sendCommand
pub async fn send_command(session: &BidiSession, params: SendCommandParams) -> Result<Value> {
    let result = session
        .inner()
        .connection
        .send_raw(&params.method, params.params, params.session.as_deref())
        .await
        .map_err(Error::from)?;

    Ok(json!(SendCommandResult {
        result,
        session: params.session,
    }))
}

/// cdp.getSession
pub async fn get_session(session: &BidiSession, params: GetSessionParams) -> Result<Value> {
    let context = session.contexts().get(&params.context).await?;
    let target = context.target().await;
    Ok(json!(GetSessionResult {
        session: target.session_id().map(str::to_string),
    }))
}

/// cdp.resolveRealm
pub async fn resolve_realm(session: &BidiSession, params: ResolveRealmParams) -> Result<Value> {
    let realm = session.inner().realms.lock().await.get(&params.realm)?;
    Ok(json!(ResolveRealmResult {
        execution_context_id: realm.execution_context_id(),
    }))
}
