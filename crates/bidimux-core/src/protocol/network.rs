//! network module parameters, results and event payloads.

use serde::{Deserialize, Serialize};

/// Interception phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterceptPhase {
    /// Pause before the request leaves.
    BeforeRequestSent,
    /// Pause when response headers arrive.
    ResponseStarted,
    /// Pause on an authentication challenge.
    AuthRequired,
}

/// A URL pattern an intercept matches against.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UrlPattern {
    /// A structured pattern; absent members match anything.
    Pattern {
        /// Protocol, without the colon.
        #[serde(default)]
        protocol: Option<String>,
        /// Hostname.
        #[serde(default)]
        hostname: Option<String>,
        /// Port as a decimal string.
        #[serde(default)]
        port: Option<String>,
        /// Path, with a leading slash.
        #[serde(default)]
        pathname: Option<String>,
        /// Search component, with or without the leading '?'.
        #[serde(default)]
        search: Option<String>,
    },
    /// A full URL string to match after normalisation.
    String {
        /// The URL.
        pattern: String,
    },
}

/// Parameters for network.addIntercept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInterceptParams {
    /// Phases to pause matching requests at.
    pub phases: Vec<InterceptPhase>,
    /// Top-level contexts to scope the intercept to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// URL patterns; everything matches when absent.
    #[serde(default)]
    pub url_patterns: Option<Vec<UrlPattern>>,
}

/// Result of network.addIntercept.
#[derive(Debug, Clone, Serialize)]
pub struct AddInterceptResult {
    /// Id of the new intercept.
    pub intercept: String,
}

/// Parameters for network.removeIntercept.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveInterceptParams {
    /// Intercept to remove.
    pub intercept: String,
}

/// A byte payload, as text or base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BytesValue {
    /// UTF-8 text.
    String {
        /// The text.
        value: String,
    },
    /// Base64-encoded bytes.
    Base64 {
        /// The encoded bytes.
        value: String,
    },
}

impl BytesValue {
    /// The decoded byte length, for size accounting.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::String { value } => value.len(),
            Self::Base64 { value } => value.len() / 4 * 3,
        }
    }
}

/// A request or response header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: BytesValue,
}

/// A Set-Cookie header in structured form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieHeader {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: Option<BytesValue>,
    /// Cookie domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Cookie path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HttpOnly attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// Secure attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// SameSite attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    /// Max-Age attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    /// Expires attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

/// BiDi SameSite spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Strict enforcement.
    Strict,
    /// Lax enforcement.
    Lax,
    /// No enforcement.
    None,
}

/// Authentication credentials for continueWithAuth.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCredentials {
    /// Credential type; always "password".
    #[serde(rename = "type")]
    pub credential_type: String,
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Parameters for network.continueRequest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestParams {
    /// The blocked request.
    pub request: String,
    /// Override the request body.
    #[serde(default)]
    pub body: Option<BytesValue>,
    /// Override the Cookie header.
    #[serde(default)]
    pub cookies: Option<Vec<Header>>,
    /// Override the request headers.
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    /// Override the request method.
    #[serde(default)]
    pub method: Option<String>,
    /// Override the request URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// Parameters for network.continueResponse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueResponseParams {
    /// The blocked request.
    pub request: String,
    /// Set-Cookie headers to add.
    #[serde(default)]
    pub cookies: Option<Vec<SetCookieHeader>>,
    /// Credentials to answer a pending auth challenge with.
    #[serde(default)]
    pub credentials: Option<AuthCredentials>,
    /// Override the response headers.
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    /// Override the reason phrase.
    #[serde(default)]
    pub reason_phrase: Option<String>,
    /// Override the status code.
    #[serde(default)]
    pub status_code: Option<u64>,
}

/// What to do with a pending auth challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContinueWithAuthAction {
    /// Let the browser handle it.
    Default,
    /// Cancel the authentication.
    Cancel,
    /// Answer with the supplied credentials.
    ProvideCredentials,
}

/// Parameters for network.continueWithAuth.
#[derive(Debug, Clone, Deserialize)]
pub struct ContinueWithAuthParams {
    /// The blocked request.
    pub request: String,
    /// The action to take.
    pub action: ContinueWithAuthAction,
    /// Credentials, required for provideCredentials.
    #[serde(default)]
    pub credentials: Option<AuthCredentials>,
}

/// Parameters for network.failRequest.
#[derive(Debug, Clone, Deserialize)]
pub struct FailRequestParams {
    /// The blocked request.
    pub request: String,
}

/// Parameters for network.provideResponse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvideResponseParams {
    /// The blocked request.
    pub request: String,
    /// Response body.
    #[serde(default)]
    pub body: Option<BytesValue>,
    /// Set-Cookie headers.
    #[serde(default)]
    pub cookies: Option<Vec<SetCookieHeader>>,
    /// Response headers.
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    /// Reason phrase.
    #[serde(default)]
    pub reason_phrase: Option<String>,
    /// Status code.
    #[serde(default)]
    pub status_code: Option<u64>,
}

/// Cache behavior choices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBehavior {
    /// Browser default caching.
    #[default]
    Default,
    /// Bypass the cache entirely.
    Bypass,
}

/// Parameters for network.setCacheBehavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCacheBehaviorParams {
    /// The behavior to apply.
    pub cache_behavior: CacheBehavior,
    /// Top-level contexts to scope to; global when absent.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Collectable data kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Response bodies.
    Response,
}

/// Parameters for network.addDataCollector.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDataCollectorParams {
    /// Data kinds to collect.
    pub data_types: Vec<DataType>,
    /// Per-request byte cap for collected payloads.
    pub max_encoded_data_size: u64,
    /// Top-level contexts to scope the collector to.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    /// User contexts to scope the collector to.
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Result of network.addDataCollector.
#[derive(Debug, Clone, Serialize)]
pub struct AddDataCollectorResult {
    /// Id of the new collector.
    pub collector: String,
}

/// Parameters for network.removeDataCollector.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveDataCollectorParams {
    /// Collector to remove.
    pub collector: String,
}

/// Parameters for network.getData.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDataParams {
    /// Request whose data to fetch.
    pub request: String,
    /// Which kind of data.
    pub data_type: DataType,
    /// Restrict to one collector.
    #[serde(default)]
    pub collector: Option<String>,
    /// Release the data from the collector after returning it.
    #[serde(default)]
    pub disown: Option<bool>,
}

/// Result of network.getData.
#[derive(Debug, Clone, Serialize)]
pub struct GetDataResult {
    /// The collected bytes.
    pub bytes: BytesValue,
}

/// Parameters for network.disownData.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisownDataParams {
    /// Request whose data to release.
    pub request: String,
    /// Which kind of data.
    pub data_type: DataType,
    /// The owning collector.
    pub collector: String,
}

// =============================================================================
// Event payloads
// =============================================================================

/// A cookie as carried on network events and storage results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: BytesValue,
    /// Cookie domain.
    pub domain: String,
    /// Cookie path.
    pub path: String,
    /// Cookie size in bytes.
    pub size: u64,
    /// HttpOnly attribute.
    pub http_only: bool,
    /// Secure attribute.
    pub secure: bool,
    /// SameSite attribute.
    pub same_site: SameSite,
    /// Expiry, seconds since the epoch; absent for session cookies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
}

/// Request timing relative to the request start.
#[derive(Debug, Clone, Copy, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FetchTimingInfo {
    /// Time origin in milliseconds.
    pub time_origin: f64,
    /// Request start time.
    pub request_time: f64,
    /// Redirect phase start.
    pub redirect_start: f64,
    /// Redirect phase end.
    pub redirect_end: f64,
    /// Fetch start.
    pub fetch_start: f64,
    /// DNS lookup start.
    pub dns_start: f64,
    /// DNS lookup end.
    pub dns_end: f64,
    /// Connect start.
    pub connect_start: f64,
    /// Connect end.
    pub connect_end: f64,
    /// TLS handshake start.
    pub tls_start: f64,
    /// Request send start.
    pub request_start: f64,
    /// First byte of the response.
    pub response_start: f64,
    /// Last byte of the response.
    pub response_end: f64,
}

/// Request description carried on every network event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    /// BiDi request id, stable across redirects.
    pub request: String,
    /// Request URL.
    pub url: String,
    /// Request method.
    pub method: String,
    /// Request headers.
    pub headers: Vec<Header>,
    /// Cookies sent with the request.
    pub cookies: Vec<Cookie>,
    /// Total bytes of the request headers.
    pub headers_size: u64,
    /// Body size, when known.
    pub body_size: Option<u64>,
    /// Request timings.
    pub timings: FetchTimingInfo,
}

/// Response description carried on response events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    /// Response URL.
    pub url: String,
    /// Protocol, e.g. "http/1.1".
    pub protocol: String,
    /// Status code.
    pub status: u64,
    /// Status text.
    pub status_text: String,
    /// Whether the response was served from cache.
    pub from_cache: bool,
    /// Response headers.
    pub headers: Vec<Header>,
    /// Response MIME type.
    pub mime_type: String,
    /// Total bytes received.
    pub bytes_received: u64,
    /// Total bytes of the response headers.
    pub headers_size: Option<u64>,
    /// Body size, when known.
    pub body_size: Option<u64>,
    /// Content size.
    pub content: ResponseContent,
    /// Authentication challenges, for 401/407 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_challenges: Option<Vec<AuthChallenge>>,
}

/// Decoded response size.
#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct ResponseContent {
    /// Decoded body size in bytes.
    pub size: u64,
}

/// One WWW-Authenticate challenge.
#[derive(Debug, Clone, Serialize)]
pub struct AuthChallenge {
    /// Challenge scheme, e.g. "basic".
    pub scheme: String,
    /// Challenge realm.
    pub realm: String,
}

/// Request initiator description.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Initiator {
    /// Initiator type: "parser", "script", "preflight" or "other".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub initiator_type: Option<String>,
    /// Column number in the initiating script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u64>,
    /// Line number in the initiating script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    /// Initiating request id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
}

/// Members shared by every network event payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseParameters {
    /// Browsing context the request belongs to.
    pub context: Option<String>,
    /// Whether the request is paused at an interception phase.
    pub is_blocked: bool,
    /// Navigation the request is part of, if any.
    pub navigation: Option<String>,
    /// Number of redirects taken so far.
    pub redirect_count: u64,
    /// The request description.
    pub request: RequestData,
    /// Event timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// Intercepts that matched, when blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercepts: Option<Vec<String>>,
}

/// Payload of network.beforeRequestSent.
#[derive(Debug, Clone, Serialize)]
pub struct BeforeRequestSent {
    /// Shared event members.
    #[serde(flatten)]
    pub base: BaseParameters,
    /// Request initiator.
    pub initiator: Initiator,
}

/// Payload of network.responseStarted and network.responseCompleted.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEvent {
    /// Shared event members.
    #[serde(flatten)]
    pub base: BaseParameters,
    /// The response description.
    pub response: ResponseData,
}

/// Payload of network.fetchError.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchError {
    /// Shared event members.
    #[serde(flatten)]
    pub base: BaseParameters,
    /// The network error text.
    pub error_text: String,
}

/// Payload of network.authRequired.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequired {
    /// Shared event members.
    #[serde(flatten)]
    pub base: BaseParameters,
    /// The challenge response so far.
    pub response: ResponseData,
}

#[cfg(test)]
mod tests;
