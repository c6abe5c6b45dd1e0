//! permissions.setPermission.

use serde_json::{Value, json};

use bidimux_cdp::protocol::browser::{
    PermissionDescriptor, PermissionSetting, SetPermissionParams as CdpSetPermissionParams,
};

use crate::error::{Error, Result};
use crate::protocol::permissions::{PermissionState, SetPermissionParams};
use crate::session::BidiSession;
use crate::session::user_contexts::UserContextStorage;

/// permissions.setPermission
pub async fn set_permission(session: &BidiSession, params: SetPermissionParams) -> Result<Value> {
    let mut descriptor = params.descriptor.clone();
    let Some(name) = descriptor
        .as_object_mut()
        .and_then(|d| d.remove("name"))
        .and_then(|n| n.as_str().map(str::to_string))
    else {
        return Err(Error::invalid_argument(
            "Permission descriptor must have a string name",
        ));
    };

    let user_context = params
        .user_context
        .unwrap_or_else(|| crate::session::DEFAULT_USER_CONTEXT.to_string());
    session
        .inner()
        .user_contexts
        .lock()
        .await
        .verify(&user_context)?;

    let setting = match params.state {
        PermissionState::Granted => PermissionSetting::Granted,
        PermissionState::Denied => PermissionSetting::Denied,
        PermissionState::Prompt => PermissionSetting::Prompt,
    };

    session
        .browser()
        .send_unit(
            "Browser.setPermission",
            Some(CdpSetPermissionParams {
                permission: PermissionDescriptor {
                    name,
                    extra: descriptor,
                },
                setting,
                origin: Some(params.origin),
                browser_context_id: UserContextStorage::browser_context_id(&user_context)
                    .map(str::to_string),
            }),
        )
        .await
        .map_err(|err| {
            if err.protocol_message_contains("Permission can't be granted") {
                Error::invalid_argument(err.to_string())
            } else {
                Error::from(err)
            }
        })?;
    Ok(json!({}))
}
