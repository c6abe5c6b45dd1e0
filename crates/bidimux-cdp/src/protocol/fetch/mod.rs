//! Fetch domain types.
//!
//! The Fetch domain pauses matching network requests at the request,
//! response or auth stage and lets the client continue, fulfill or fail
//! them. It is the mechanism behind BiDi network interception.

use serde::{Deserialize, Serialize};

use super::network::{Request, ResourceType};

/// Unique request identifier for the Fetch domain.
///
/// Distinct from the Network domain request id; requestPaused carries the
/// Network id separately as `networkId`.
pub type RequestId = String;

/// Response HTTP header entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Stage at which to begin intercepting requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestStage {
    /// Intercept before the request is sent.
    #[default]
    Request,
    /// Intercept after the response headers are received.
    Response,
}

/// Request pattern for interception.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    /// Wildcards ('*' -> zero or more, '?' -> exactly one) are allowed.
    /// Escape character is backslash. Omitting is equivalent to "*".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    /// If set, only requests for matching resource types will be intercepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    /// Stage at which to begin intercepting requests. Default is Request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_stage: Option<RequestStage>,
}

// =============================================================================
// Commands
// =============================================================================

/// Parameters for Fetch.enable.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    /// Only requests matching any of these patterns will be paused.
    /// If not set, all requests will be affected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<RequestPattern>>,
    /// If true, authRequired events will be issued and requests will be
    /// paused expecting a call to continueWithAuth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_auth_requests: Option<bool>,
}

/// Parameters for Fetch.disable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisableParams {}

/// Parameters for Fetch.continueRequest.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestParams {
    /// An id the client received in requestPaused event.
    pub request_id: RequestId,
    /// If set, the request url will be modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// If set, the request method is overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// If set, overrides the post data in the request (base64).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    /// If set, overrides request headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderEntry>>,
    /// If set, overrides response interception behavior for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept_response: Option<bool>,
}

/// Parameters for Fetch.continueResponse.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContinueResponseParams {
    /// An id the client received in requestPaused event.
    pub request_id: RequestId,
    /// An HTTP response code; overrides the paused response code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<i64>,
    /// A textual representation of responseCode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
    /// Response headers; overrides the paused response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
}

/// Parameters for Fetch.fulfillRequest.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestParams {
    /// An id the client received in requestPaused event.
    pub request_id: RequestId,
    /// An HTTP response code.
    pub response_code: i64,
    /// A textual representation of responseCode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
    /// Response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
    /// A response body (base64).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Parameters for Fetch.failRequest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequestParams {
    /// An id the client received in requestPaused event.
    pub request_id: RequestId,
    /// Causes the request to fail with the given reason.
    pub error_reason: String,
}

/// Response to an authChallenge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallengeResponse {
    /// The decision on what to do: "Default", "CancelAuth" or
    /// "ProvideCredentials".
    pub response: String,
    /// The username to provide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// The password to provide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Parameters for Fetch.continueWithAuth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWithAuthParams {
    /// An id the client received in authRequired event.
    pub request_id: RequestId,
    /// Response to the auth challenge.
    pub auth_challenge_response: AuthChallengeResponse,
}

// =============================================================================
// Events
// =============================================================================

/// Event: Fetch.requestPaused
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPausedEvent {
    /// Each request the page makes will have a unique id.
    pub request_id: RequestId,
    /// The details of the request.
    pub request: Request,
    /// The id of the frame that initiated the request.
    pub frame_id: String,
    /// How the requested resource will be used.
    pub resource_type: ResourceType,
    /// Response error if intercepted at response stage.
    pub response_error_reason: Option<String>,
    /// Response code if intercepted at response stage.
    pub response_status_code: Option<i64>,
    /// Response status text if intercepted at response stage.
    pub response_status_text: Option<String>,
    /// Response headers if intercepted at the response stage.
    pub response_headers: Option<Vec<HeaderEntry>>,
    /// If the intercepted request had a corresponding Network.requestWillBeSent
    /// event fired for it, then this id is the same as its requestId.
    pub network_id: Option<super::network::RequestId>,
    /// If the request is due to a redirect response from the server, the id
    /// of the request that has caused the redirect.
    pub redirected_request_id: Option<RequestId>,
}

/// Challenge details for an authRequired event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    /// Source of the authentication challenge ("Server" or "Proxy").
    pub source: Option<String>,
    /// Origin of the challenger.
    pub origin: String,
    /// The authentication scheme used, such as basic or digest.
    pub scheme: String,
    /// The realm of the challenge. May be empty.
    pub realm: String,
}

/// Event: Fetch.authRequired
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequiredEvent {
    /// Each request the page makes will have a unique id.
    pub request_id: RequestId,
    /// The details of the request.
    pub request: Request,
    /// The id of the frame that initiated the request.
    pub frame_id: String,
    /// How the requested resource will be used.
    pub resource_type: ResourceType,
    /// Details of the Authorization Challenge encountered.
    pub auth_challenge: AuthChallenge,
}

#[cfg(test)]
mod tests;
