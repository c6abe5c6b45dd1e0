//! browser.* commands.

use serde_json::{Value, json};

use bidimux_cdp::protocol::browser::{
    Bounds, GetWindowForTargetParams, GetWindowForTargetResult, SetWindowBoundsParams, WindowState,
};
use bidimux_cdp::protocol::target_domain::{
    CreateBrowserContextParams, CreateBrowserContextResult, DisposeBrowserContextParams,
};

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::browser::{
    ClientWindowInfo, ClientWindowState, CreateUserContextParams, GetClientWindowsResult,
    GetUserContextsResult, RemoveUserContextParams, SetClientWindowStateParams, UserContextInfo,
};
use crate::protocol::session::EmptyParams;
use crate::session::BidiSession;
use crate::session::user_contexts::UserContextConfig;

/// browser.close
pub async fn close(session: &BidiSession, _params: EmptyParams) -> Result<Value> {
    session
        .browser()
        .send_unit::<Value>("Browser.close", None)
        .await
        .map_err(|err| {
            Error::new(ErrorCode::UnableToCloseBrowser, err.to_string())
        })?;
    Ok(json!({}))
}

/// browser.createUserContext
pub async fn create_user_context(
    session: &BidiSession,
    params: CreateUserContextParams,
) -> Result<Value> {
    let result: CreateBrowserContextResult = session
        .browser()
        .send(
            "Target.createBrowserContext",
            Some(CreateBrowserContextParams::default()),
        )
        .await
        .map_err(Error::from)?;

    let user_context = result.browser_context_id;
    session.inner().user_contexts.lock().await.add(
        user_context.clone(),
        UserContextConfig {
            accept_insecure_certs: params.accept_insecure_certs,
            ..UserContextConfig::default()
        },
    );
    Ok(json!(UserContextInfo { user_context }))
}

/// browser.removeUserContext
pub async fn remove_user_context(
    session: &BidiSession,
    params: RemoveUserContextParams,
) -> Result<Value> {
    {
        let mut user_contexts = session.inner().user_contexts.lock().await;
        user_contexts.remove(&params.user_context)?;
    }
    session
        .browser()
        .send_unit(
            "Target.disposeBrowserContext",
            Some(DisposeBrowserContextParams {
                browser_context_id: params.user_context,
            }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// browser.getUserContexts
pub async fn get_user_contexts(session: &BidiSession, _params: EmptyParams) -> Result<Value> {
    let user_contexts = session
        .inner()
        .user_contexts
        .lock()
        .await
        .ids()
        .into_iter()
        .map(|user_context| UserContextInfo { user_context })
        .collect();
    Ok(json!(GetUserContextsResult { user_contexts }))
}

fn window_state_to_bidi(state: Option<WindowState>) -> ClientWindowState {
    match state {
        Some(WindowState::Fullscreen) => ClientWindowState::Fullscreen,
        Some(WindowState::Maximized) => ClientWindowState::Maximized,
        Some(WindowState::Minimized) => ClientWindowState::Minimized,
        Some(WindowState::Normal) | None => ClientWindowState::Normal,
    }
}

fn window_state_to_cdp(state: ClientWindowState) -> WindowState {
    match state {
        ClientWindowState::Fullscreen => WindowState::Fullscreen,
        ClientWindowState::Maximized => WindowState::Maximized,
        ClientWindowState::Minimized => WindowState::Minimized,
        ClientWindowState::Normal => WindowState::Normal,
    }
}

/// browser.getClientWindows
pub async fn get_client_windows(session: &BidiSession, _params: EmptyParams) -> Result<Value> {
    let mut windows: Vec<ClientWindowInfo> = Vec::new();
    for context in session.contexts().top_level_contexts().await {
        let target = context.target().await;
        let result: GetWindowForTargetResult = session
            .browser()
            .send(
                "Browser.getWindowForTarget",
                Some(GetWindowForTargetParams {
                    target_id: target.target_id().to_string(),
                }),
            )
            .await
            .map_err(Error::from)?;

        let client_window = result.window_id.to_string();
        if windows.iter().any(|w| w.client_window == client_window) {
            continue;
        }
        windows.push(ClientWindowInfo {
            active: false,
            client_window,
            state: window_state_to_bidi(result.bounds.window_state),
            width: result.bounds.width.unwrap_or(0).max(0) as u64,
            height: result.bounds.height.unwrap_or(0).max(0) as u64,
            x: result.bounds.left.unwrap_or(0),
            y: result.bounds.top.unwrap_or(0),
        });
    }
    windows.sort_by(|a, b| a.client_window.cmp(&b.client_window));
    Ok(json!(GetClientWindowsResult {
        client_windows: windows
    }))
}

/// browser.setClientWindowState
pub async fn set_client_window_state(
    session: &BidiSession,
    params: SetClientWindowStateParams,
) -> Result<Value> {
    let window_id: i64 = params.client_window.parse().map_err(|_| {
        Error::invalid_argument(format!(
            "Client window '{}' not found",
            params.client_window
        ))
    })?;

    let state = params.state.unwrap_or(ClientWindowState::Normal);
    let bounds = match state {
        ClientWindowState::Normal => Bounds {
            left: params.x,
            top: params.y,
            width: params.width.map(|w| w as i64),
            height: params.height.map(|h| h as i64),
            window_state: Some(WindowState::Normal),
        },
        other => Bounds {
            window_state: Some(window_state_to_cdp(other)),
            ..Bounds::default()
        },
    };

    session
        .browser()
        .send_unit(
            "Browser.setWindowBounds",
            Some(SetWindowBoundsParams {
                window_id,
                bounds,
            }),
        )
        .await
        .map_err(Error::from)?;

    Ok(json!(ClientWindowInfo {
        active: false,
        client_window: params.client_window,
        state,
        width: params.width.unwrap_or(0),
        height: params.height.unwrap_or(0),
        x: params.x.unwrap_or(0),
        y: params.y.unwrap_or(0),
    }))
}