//! network.* commands.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use bidimux_cdp::protocol::fetch::{
    AuthChallengeResponse, ContinueRequestParams as FetchContinueRequest,
    ContinueResponseParams as FetchContinueResponse, ContinueWithAuthParams as FetchContinueWithAuth,
    FailRequestParams as FetchFailRequest, FulfillRequestParams as FetchFulfillRequest, HeaderEntry,
};
use bidimux_cdp::protocol::network::{
    GetResponseBodyParams, GetResponseBodyResult, SetCacheDisabledParams,
};

use crate::error::{Error, ErrorCode, Result};
use crate::network::headers::{bytes_value_text, headers_to_fetch, set_cookie_header_line};
use crate::protocol::network::{
    AddDataCollectorParams, AddDataCollectorResult, AddInterceptParams, AddInterceptResult,
    BytesValue, CacheBehavior, ContinueRequestParams, ContinueResponseParams,
    ContinueWithAuthAction, ContinueWithAuthParams, DataType, DisownDataParams, FailRequestParams,
    GetDataParams, GetDataResult, InterceptPhase, ProvideResponseParams, RemoveDataCollectorParams,
    RemoveInterceptParams, SetCacheBehaviorParams,
};
use crate::session::BidiSession;

use super::session::update_network_enablement;

/// Resolve the CDP session and Fetch request id of a blocked request, and
/// clear its interception phase.
async fn take_interception(
    session: &BidiSession,
    request_id: &str,
    allowed: &[InterceptPhase],
) -> Result<(String, Option<String>)> {
    let mut network = session.inner().network.lock().await;
    let request = network.blocked_request_mut(request_id)?;
    let interception = request
        .interception()
        .cloned()
        .expect("blocked_request_mut checked");
    if !allowed.contains(&interception.phase) {
        return Err(Error::invalid_argument(format!(
            "Request '{request_id}' is not blocked at a compatible phase"
        )));
    }
    request.clear_interception();
    let session_id = request.session_id().map(str::to_string);
    Ok((interception.fetch_request_id, session_id))
}

/// Send a Fetch-domain command on the session owning the request.
async fn send_fetch<P: serde::Serialize>(
    session: &BidiSession,
    session_id: Option<String>,
    method: &str,
    params: P,
) -> Result<()> {
    let client = match session_id {
        Some(session_id) => match session.target_for_session(&session_id).await {
            Some(target) => target.session().clone(),
            None => {
                return Err(Error::new(
                    ErrorCode::NoSuchRequest,
                    "The request's target is gone",
                ));
            }
        },
        None => session.browser().clone(),
    };
    client.send_unit(method, Some(params)).await.map_err(Error::from)
}

/// network.addIntercept
pub async fn add_intercept(session: &BidiSession, params: AddInterceptParams) -> Result<Value> {
    let mut contexts = Vec::new();
    for context in params.contexts.as_deref().unwrap_or_default() {
        let top_level = session.contexts().get_top_level(context).await?;
        contexts.push(top_level.id().to_string());
    }

    let intercept = {
        let mut network = session.inner().network.lock().await;
        network.add_intercept(params.phases, params.url_patterns, contexts)?
    };
    session.apply_fetch_state().await?;
    Ok(json!(AddInterceptResult { intercept }))
}

/// network.removeIntercept
pub async fn remove_intercept(
    session: &BidiSession,
    params: RemoveInterceptParams,
) -> Result<Value> {
    {
        let mut network = session.inner().network.lock().await;
        network.remove_intercept(&params.intercept)?;
    }
    session.apply_fetch_state().await?;
    Ok(json!({}))
}

/// network.continueRequest
pub async fn continue_request(
    session: &BidiSession,
    params: ContinueRequestParams,
) -> Result<Value> {
    let (fetch_id, session_id) = take_interception(
        session,
        &params.request,
        &[InterceptPhase::BeforeRequestSent],
    )
    .await?;

    let mut headers = params.headers.as_deref().map(headers_to_fetch);
    if let Some(cookies) = &params.cookies {
        let cookie_line = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, bytes_value_text(&c.value)))
            .collect::<Vec<_>>()
            .join("; ");
        headers
            .get_or_insert_with(Vec::new)
            .push(HeaderEntry {
                name: "Cookie".to_string(),
                value: cookie_line,
            });
    }

    send_fetch(
        session,
        session_id,
        "Fetch.continueRequest",
        FetchContinueRequest {
            request_id: fetch_id,
            url: params.url,
            method: params.method,
            post_data: params
                .body
                .as_ref()
                .map(|body| BASE64.encode(bytes_value_text(body))),
            headers,
            intercept_response: None,
        },
    )
    .await?;
    Ok(json!({}))
}

/// network.continueResponse
pub async fn continue_response(
    session: &BidiSession,
    params: ContinueResponseParams,
) -> Result<Value> {
    let (fetch_id, session_id) = take_interception(
        session,
        &params.request,
        &[InterceptPhase::ResponseStarted, InterceptPhase::AuthRequired],
    )
    .await?;

    // Credentials answer a pending auth challenge instead of continuing
    // the paused response.
    if let Some(credentials) = params.credentials {
        send_fetch(
            session,
            session_id,
            "Fetch.continueWithAuth",
            FetchContinueWithAuth {
                request_id: fetch_id,
                auth_challenge_response: AuthChallengeResponse {
                    response: "ProvideCredentials".to_string(),
                    username: Some(credentials.username),
                    password: Some(credentials.password),
                },
            },
        )
        .await?;
        return Ok(json!({}));
    }

    let mut headers = params.headers.as_deref().map(headers_to_fetch);
    for cookie in params.cookies.as_deref().unwrap_or_default() {
        headers.get_or_insert_with(Vec::new).push(HeaderEntry {
            name: "Set-Cookie".to_string(),
            value: set_cookie_header_line(cookie),
        });
    }

    send_fetch(
        session,
        session_id,
        "Fetch.continueResponse",
        FetchContinueResponse {
            request_id: fetch_id,
            response_code: params.status_code.map(|s| s as i64),
            response_phrase: params.reason_phrase,
            response_headers: headers,
        },
    )
    .await?;
    Ok(json!({}))
}

/// network.continueWithAuth
pub async fn continue_with_auth(
    session: &BidiSession,
    params: ContinueWithAuthParams,
) -> Result<Value> {
    let (fetch_id, session_id) =
        take_interception(session, &params.request, &[InterceptPhase::AuthRequired]).await?;

    let auth_challenge_response = match params.action {
        ContinueWithAuthAction::Default => AuthChallengeResponse {
            response: "Default".to_string(),
            username: None,
            password: None,
        },
        ContinueWithAuthAction::Cancel => AuthChallengeResponse {
            response: "CancelAuth".to_string(),
            username: None,
            password: None,
        },
        ContinueWithAuthAction::ProvideCredentials => {
            let credentials = params.credentials.ok_or_else(|| {
                Error::invalid_argument("provideCredentials requires credentials")
            })?;
            AuthChallengeResponse {
                response: "ProvideCredentials".to_string(),
                username: Some(credentials.username),
                password: Some(credentials.password),
            }
        }
    };

    send_fetch(
        session,
        session_id,
        "Fetch.continueWithAuth",
        FetchContinueWithAuth {
            request_id: fetch_id,
            auth_challenge_response,
        },
    )
    .await?;
    Ok(json!({}))
}

/// network.failRequest
pub async fn fail_request(session: &BidiSession, params: FailRequestParams) -> Result<Value> {
    let (fetch_id, session_id) = take_interception(
        session,
        &params.request,
        &[
            InterceptPhase::BeforeRequestSent,
            InterceptPhase::ResponseStarted,
        ],
    )
    .await?;

    send_fetch(
        session,
        session_id,
        "Fetch.failRequest",
        FetchFailRequest {
            request_id: fetch_id,
            error_reason: "Failed".to_string(),
        },
    )
    .await?;
    Ok(json!({}))
}

/// network.provideResponse
pub async fn provide_response(
    session: &BidiSession,
    params: ProvideResponseParams,
) -> Result<Value> {
    let (fetch_id, session_id) = take_interception(
        session,
        &params.request,
        &[
            InterceptPhase::BeforeRequestSent,
            InterceptPhase::ResponseStarted,
            InterceptPhase::AuthRequired,
        ],
    )
    .await?;

    let mut headers = params.headers.as_deref().map(headers_to_fetch).unwrap_or_default();
    for cookie in params.cookies.as_deref().unwrap_or_default() {
        headers.push(HeaderEntry {
            name: "Set-Cookie".to_string(),
            value: set_cookie_header_line(cookie),
        });
    }

    send_fetch(
        session,
        session_id,
        "Fetch.fulfillRequest",
        FetchFulfillRequest {
            request_id: fetch_id,
            response_code: params.status_code.map_or(200, |s| s as i64),
            response_phrase: params.reason_phrase,
            response_headers: (!headers.is_empty()).then_some(headers),
            body: params
                .body
                .as_ref()
                .map(|body| BASE64.encode(bytes_value_text(body))),
        },
    )
    .await?;
    Ok(json!({}))
}

/// network.setCacheBehavior
pub async fn set_cache_behavior(
    session: &BidiSession,
    params: SetCacheBehaviorParams,
) -> Result<Value> {
    let cache_disabled = params.cache_behavior == CacheBehavior::Bypass;

    match params.contexts.as_deref() {
        None => {
            // Global: remember for future targets, apply everywhere now.
            {
                let mut network = session.inner().network.lock().await;
                network.set_default_cache_behavior(params.cache_behavior);
            }
            for target in session.all_targets().await {
                target
                    .session()
                    .send_unit(
                        "Network.setCacheDisabled",
                        Some(SetCacheDisabledParams { cache_disabled }),
                    )
                    .await
                    .map_err(Error::from)?;
            }
        }
        Some(contexts) => {
            for context_id in contexts {
                let context = session.contexts().get_top_level(context_id).await?;
                let target = context.target().await;
                target
                    .session()
                    .send_unit(
                        "Network.setCacheDisabled",
                        Some(SetCacheDisabledParams { cache_disabled }),
                    )
                    .await
                    .map_err(Error::from)?;
            }
        }
    }
    Ok(json!({}))
}

/// network.addDataCollector
pub async fn add_data_collector(
    session: &BidiSession,
    params: AddDataCollectorParams,
) -> Result<Value> {
    let mut contexts = Vec::new();
    for context in params.contexts.as_deref().unwrap_or_default() {
        let top_level = session.contexts().get_top_level(context).await?;
        contexts.push(top_level.id().to_string());
    }
    if let Some(user_contexts) = &params.user_contexts {
        let storage = session.inner().user_contexts.lock().await;
        for user_context in user_contexts {
            storage.verify(user_context)?;
        }
    }

    let collector = {
        let mut network = session.inner().network.lock().await;
        network.add_collector(
            params.data_types,
            params.max_encoded_data_size,
            contexts,
            params.user_contexts.unwrap_or_default(),
        )?
    };
    // Collectors need the Network domain to buffer bodies.
    update_network_enablement(session).await;
    Ok(json!(AddDataCollectorResult { collector }))
}

/// network.removeDataCollector
pub async fn remove_data_collector(
    session: &BidiSession,
    params: RemoveDataCollectorParams,
) -> Result<Value> {
    {
        let mut network = session.inner().network.lock().await;
        network.remove_collector(&params.collector)?;
    }
    update_network_enablement(session).await;
    Ok(json!({}))
}

/// network.getData
pub async fn get_data(session: &BidiSession, params: GetDataParams) -> Result<Value> {
    if params.data_type != DataType::Response {
        return Err(Error::invalid_argument("Only response data is collected"));
    }
    if params.disown == Some(true) && params.collector.is_none() {
        return Err(Error::invalid_argument(
            "'disown' requires a 'collector'",
        ));
    }

    let (max_size, session_id, collector_id) = {
        let network = session.inner().network.lock().await;
        let collector = network.validate_get_data(&params.request, params.collector.as_deref())?;
        let session_id = network
            .existing_request(&params.request)
            .and_then(|r| r.session_id().map(str::to_string));
        (
            collector.max_encoded_data_size,
            session_id,
            collector.id.clone(),
        )
    };

    let client = match session_id {
        Some(session_id) => match session.target_for_session(&session_id).await {
            Some(target) => target.session().clone(),
            None => {
                return Err(Error::new(
                    ErrorCode::NoSuchNetworkData,
                    "The request's target is gone",
                ));
            }
        },
        None => session.browser().clone(),
    };

    let body: GetResponseBodyResult = client
        .send(
            "Network.getResponseBody",
            Some(GetResponseBodyParams {
                request_id: params.request.clone(),
            }),
        )
        .await
        .map_err(|err| Error::new(ErrorCode::NoSuchNetworkData, err.to_string()))?;

    let bytes = if body.base64_encoded {
        BytesValue::Base64 { value: body.body }
    } else {
        BytesValue::String { value: body.body }
    };
    if bytes.byte_len() as u64 > max_size {
        return Err(Error::new(
            ErrorCode::NoSuchNetworkData,
            "Response body exceeds the collector's size limit",
        ));
    }

    if params.disown == Some(true) {
        let mut network = session.inner().network.lock().await;
        network.disown_data(&params.request, &collector_id)?;
    }
    Ok(json!(GetDataResult { bytes }))
}

/// network.disownData
pub async fn disown_data(session: &BidiSession, params: DisownDataParams) -> Result<Value> {
    if params.data_type != DataType::Response {
        return Err(Error::invalid_argument("Only response data is collected"));
    }
    let mut network = session.inner().network.lock().await;
    network.disown_data(&params.request, &params.collector)?;
    Ok(json!({}))
}
