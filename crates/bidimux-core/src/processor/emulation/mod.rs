//! emulation.* commands.
//!
//! Overrides are applied to the targets of the addressed contexts or user
//! contexts, and recorded per user context so new targets pick them up on
//! attach.

use std::sync::Arc;

use serde_json::{Value, json};

use bidimux_cdp::protocol::emulation::{
    ClearGeolocationOverrideParams, ScreenOrientationType, SetGeolocationOverrideParams,
    SetLocaleOverrideParams, SetScreenOrientationOverrideParams, SetTimezoneOverrideParams,
};

use crate::error::{Error, Result};
use crate::protocol::emulation as params_mod;
use crate::session::BidiSession;
use crate::target::CdpTarget;

/// The targets an emulation command applies to, plus the user contexts to
/// record the override for.
async fn resolve_scope(
    session: &BidiSession,
    contexts: Option<&[String]>,
    user_contexts: Option<&[String]>,
) -> Result<(Vec<Arc<CdpTarget>>, Vec<String>)> {
    if contexts.is_some() == user_contexts.is_some() {
        return Err(Error::invalid_argument(
            "Exactly one of 'contexts' and 'userContexts' must be provided",
        ));
    }

    let mut targets = Vec::new();
    let mut record_for = Vec::new();

    if let Some(contexts) = contexts {
        if contexts.is_empty() {
            return Err(Error::invalid_argument("'contexts' must not be empty"));
        }
        for context_id in contexts {
            let context = session.contexts().get_top_level(context_id).await?;
            targets.push(context.target().await);
        }
    }
    if let Some(user_contexts) = user_contexts {
        if user_contexts.is_empty() {
            return Err(Error::invalid_argument("'userContexts' must not be empty"));
        }
        let storage = session.inner().user_contexts.lock().await;
        for user_context in user_contexts {
            storage.verify(user_context)?;
        }
        drop(storage);
        record_for = user_contexts.to_vec();
        for context in session.contexts().top_level_contexts().await {
            if user_contexts.iter().any(|u| u == context.user_context()) {
                targets.push(context.target().await);
            }
        }
    }
    Ok((targets, record_for))
}

/// emulation.setGeolocationOverride
pub async fn set_geolocation_override(
    session: &BidiSession,
    params: params_mod::SetGeolocationOverrideParams,
) -> Result<Value> {
    if params.coordinates.is_some() && params.error.is_some() {
        return Err(Error::invalid_argument(
            "Only one of 'coordinates' and 'error' may be set",
        ));
    }
    if let Some(error) = &params.error {
        if error.error_type != "positionUnavailable" {
            return Err(Error::invalid_argument(format!(
                "Unknown geolocation error '{}'",
                error.error_type
            )));
        }
    }

    let (targets, record_for) = resolve_scope(
        session,
        params.contexts.as_deref(),
        params.user_contexts.as_deref(),
    )
    .await?;

    // `error` emulates an unavailable position: an override with no
    // coordinates. Absent coordinates and error clear the override.
    let cdp_params = params.coordinates.map(|c| SetGeolocationOverrideParams {
        latitude: Some(c.latitude),
        longitude: Some(c.longitude),
        accuracy: Some(c.accuracy.unwrap_or(1.0)),
        altitude: c.altitude,
        altitude_accuracy: c.altitude_accuracy,
        heading: c.heading,
        speed: c.speed,
    });
    let unavailable = params.error.is_some();

    for target in targets {
        if let Some(cdp_params) = &cdp_params {
            target
                .session()
                .send_unit("Emulation.setGeolocationOverride", Some(cdp_params.clone()))
                .await
                .map_err(Error::from)?;
        } else if unavailable {
            target
                .session()
                .send_unit(
                    "Emulation.setGeolocationOverride",
                    Some(SetGeolocationOverrideParams::default()),
                )
                .await
                .map_err(Error::from)?;
        } else {
            target
                .session()
                .send_unit(
                    "Emulation.clearGeolocationOverride",
                    Some(ClearGeolocationOverrideParams::default()),
                )
                .await
                .map_err(Error::from)?;
        }
    }

    let mut storage = session.inner().user_contexts.lock().await;
    for user_context in record_for {
        if let Some(config) = storage.config_mut(&user_context) {
            config.overrides.geolocation = if unavailable {
                Some(SetGeolocationOverrideParams::default())
            } else {
                cdp_params.clone()
            };
        }
    }
    Ok(json!({}))
}

/// emulation.setLocaleOverride
pub async fn set_locale_override(
    session: &BidiSession,
    params: params_mod::SetLocaleOverrideParams,
) -> Result<Value> {
    let (targets, record_for) = resolve_scope(
        session,
        params.contexts.as_deref(),
        params.user_contexts.as_deref(),
    )
    .await?;

    let cdp_params = SetLocaleOverrideParams {
        locale: params.locale.clone(),
    };
    for target in targets {
        target
            .session()
            .send_unit("Emulation.setLocaleOverride", Some(cdp_params.clone()))
            .await
            .map_err(Error::from)?;
    }

    let mut storage = session.inner().user_contexts.lock().await;
    for user_context in record_for {
        if let Some(config) = storage.config_mut(&user_context) {
            config.overrides.locale =
                params.locale.is_some().then(|| cdp_params.clone());
        }
    }
    Ok(json!({}))
}

/// emulation.setScreenOrientationOverride
pub async fn set_screen_orientation_override(
    session: &BidiSession,
    params: params_mod::SetScreenOrientationOverrideParams,
) -> Result<Value> {
    let (targets, record_for) = resolve_scope(
        session,
        params.contexts.as_deref(),
        params.user_contexts.as_deref(),
    )
    .await?;

    let cdp_params = params.screen_orientation.map(|orientation| {
        let (orientation_type, angle) = match orientation.orientation_type {
            params_mod::OrientationType::PortraitPrimary => {
                (ScreenOrientationType::PortraitPrimary, 0)
            }
            params_mod::OrientationType::PortraitSecondary => {
                (ScreenOrientationType::PortraitSecondary, 180)
            }
            params_mod::OrientationType::LandscapePrimary => {
                (ScreenOrientationType::LandscapePrimary, 90)
            }
            params_mod::OrientationType::LandscapeSecondary => {
                (ScreenOrientationType::LandscapeSecondary, 270)
            }
        };
        SetScreenOrientationOverrideParams {
            angle,
            orientation_type,
        }
    });

    for target in &targets {
        match &cdp_params {
            Some(cdp_params) => target
                .session()
                .send_unit(
                    "Emulation.setScreenOrientationOverride",
                    Some(cdp_params.clone()),
                )
                .await
                .map_err(Error::from)?,
            None => target
                .session()
                .send_raw("Emulation.clearScreenOrientationOverride", None)
                .await
                .map(|_| ())
                .map_err(Error::from)?,
        }
    }

    let mut storage = session.inner().user_contexts.lock().await;
    for user_context in record_for {
        if let Some(config) = storage.config_mut(&user_context) {
            config.overrides.screen_orientation = cdp_params.clone();
        }
    }
    Ok(json!({}))
}

/// emulation.setTimezoneOverride
pub async fn set_timezone_override(
    session: &BidiSession,
    params: params_mod::SetTimezoneOverrideParams,
) -> Result<Value> {
    let (targets, record_for) = resolve_scope(
        session,
        params.contexts.as_deref(),
        params.user_contexts.as_deref(),
    )
    .await?;

    // An empty timezone id restores the browser default.
    let cdp_params = SetTimezoneOverrideParams {
        timezone_id: params.timezone.clone().unwrap_or_default(),
    };
    for target in targets {
        target
            .session()
            .send_unit("Emulation.setTimezoneOverride", Some(cdp_params.clone()))
            .await
            .map_err(Error::from)?;
    }

    let mut storage = session.inner().user_contexts.lock().await;
    for user_context in record_for {
        if let Some(config) = storage.config_mut(&user_context) {
            config.overrides.timezone =
                params.timezone.is_some().then(|| cdp_params.clone());
        }
    }
    Ok(json!({}))
}

/// Re-apply the recorded overrides of a user context onto a fresh target.
pub(crate) async fn apply_overrides_to_target(
    session: &BidiSession,
    user_context: &str,
    target: &Arc<CdpTarget>,
) {
    let overrides = {
        let storage = session.inner().user_contexts.lock().await;
        match storage.config(user_context) {
            Some(config) => config.overrides.clone(),
            None => return,
        }
    };

    if let Some(geolocation) = overrides.geolocation {
        let _ = target
            .session()
            .send_unit("Emulation.setGeolocationOverride", Some(geolocation))
            .await;
    }
    if let Some(locale) = overrides.locale {
        let _ = target
            .session()
            .send_unit("Emulation.setLocaleOverride", Some(locale))
            .await;
    }
    if let Some(timezone) = overrides.timezone {
        let _ = target
            .session()
            .send_unit("Emulation.setTimezoneOverride", Some(timezone))
            .await;
    }
    if let Some(orientation) = overrides.screen_orientation {
        let _ = target
            .session()
            .send_unit("Emulation.setScreenOrientationOverride", Some(orientation))
            .await;
    }
}
