//! Network domain types.
//!
//! The Network domain tracks network activities of the page: requests,
//! responses, loading failures and cookies. The mediator joins its events
//! into BiDi network events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique request identifier.
pub type RequestId = String;

/// Unique loader identifier.
pub type LoaderId = String;

/// Request / response headers as keys and string values.
pub type Headers = serde_json::Map<String, Value>;

/// Resource type as it was perceived by the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    /// HTML document.
    Document,
    /// CSS stylesheet.
    Stylesheet,
    /// Image.
    Image,
    /// Media resource.
    Media,
    /// Web font.
    Font,
    /// Script.
    Script,
    /// Text track.
    TextTrack,
    /// XMLHttpRequest.
    XHR,
    /// fetch().
    Fetch,
    /// Prefetched resource.
    Prefetch,
    /// EventSource.
    EventSource,
    /// WebSocket handshake.
    WebSocket,
    /// Web app manifest.
    Manifest,
    /// Signed HTTP exchange.
    SignedExchange,
    /// Ping.
    Ping,
    /// CSP violation report.
    CSPViolationReport,
    /// CORS preflight.
    Preflight,
    /// FedCM request.
    FedCM,
    /// Everything else.
    Other,
}

/// HTTP request data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request URL (without fragment).
    pub url: String,
    /// Fragment of the requested URL, including '#'.
    pub url_fragment: Option<String>,
    /// HTTP request method.
    pub method: String,
    /// HTTP request headers.
    pub headers: Headers,
    /// HTTP POST request data.
    pub post_data: Option<String>,
    /// True when the request has POST data.
    pub has_post_data: Option<bool>,
    /// Priority of the resource request at the time the request was sent.
    pub initial_priority: Option<String>,
    /// The referrer policy of the request.
    pub referrer_policy: Option<String>,
}

/// HTTP response data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Response URL.
    pub url: String,
    /// HTTP response status code.
    pub status: i64,
    /// HTTP response status text.
    pub status_text: String,
    /// HTTP response headers.
    pub headers: Headers,
    /// Resource mimeType.
    pub mime_type: String,
    /// Protocol the request was fetched with, e.g. "h2".
    pub protocol: Option<String>,
    /// Remote IP address.
    pub remote_ip_address: Option<String>,
    /// Remote port.
    pub remote_port: Option<i64>,
    /// True when the response was fetched from disk cache.
    pub from_disk_cache: Option<bool>,
    /// True when the response was fetched via a service worker.
    pub from_service_worker: Option<bool>,
    /// Total number of bytes received so far.
    pub encoded_data_length: Option<f64>,
}

/// Information about the request initiator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiator {
    /// Type of the initiator ("parser", "script", "preload", "other", ...).
    #[serde(rename = "type")]
    pub initiator_type: String,
    /// Initiator URL.
    pub url: Option<String>,
    /// Initiator line number (0-based).
    pub line_number: Option<f64>,
    /// Initiator column number (0-based).
    pub column_number: Option<f64>,
}

// =============================================================================
// Cookies
// =============================================================================

/// Cookie SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookieSameSite {
    /// Strict same-site enforcement.
    Strict,
    /// Lax same-site enforcement.
    Lax,
    /// Cross-site cookies allowed.
    None,
}

/// Partition key of a partitioned cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookiePartitionKey {
    /// Site of the top-level URL the cookie was set under.
    pub top_level_site: String,
    /// Whether the cookie was set in a cross-site ancestor chain.
    pub has_cross_site_ancestor: bool,
}

/// A browser cookie.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Cookie domain.
    pub domain: String,
    /// Cookie path.
    pub path: String,
    /// Expiration date as the number of seconds since the UNIX epoch;
    /// -1 for session cookies.
    pub expires: f64,
    /// Cookie size.
    pub size: i64,
    /// True if cookie is http-only.
    pub http_only: bool,
    /// True if cookie is secure.
    pub secure: bool,
    /// True in case of session cookie.
    pub session: bool,
    /// Cookie SameSite type.
    pub same_site: Option<CookieSameSite>,
    /// Cookie partition key.
    pub partition_key: Option<CookiePartitionKey>,
}

/// Cookie parameter for Storage.setCookies.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CookieParam {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// The request-URI to associate with the cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Cookie domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Cookie path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// True if cookie is secure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// True if cookie is http-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// Cookie SameSite type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<CookieSameSite>,
    /// Cookie expiration date, seconds since the UNIX epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    /// Cookie partition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<CookiePartitionKey>,
}

// =============================================================================
// Commands
// =============================================================================

/// Parameters for Network.enable.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    /// Buffer size in bytes to use when preserving network payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_buffer_size: Option<i64>,
    /// Per-resource buffer size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resource_buffer_size: Option<i64>,
}

/// Parameters for Network.disable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisableParams {}

/// Parameters for Network.setCacheDisabled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCacheDisabledParams {
    /// Cache disabled state.
    pub cache_disabled: bool,
}

/// Parameters for Network.getResponseBody.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponseBodyParams {
    /// Identifier of the network request to get content for.
    pub request_id: RequestId,
}

/// Result of Network.getResponseBody.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponseBodyResult {
    /// Response body.
    pub body: String,
    /// True if the content was sent as base64.
    pub base64_encoded: bool,
}

/// Parameters for Network.deleteCookies.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCookiesParams {
    /// Name of the cookies to remove.
    pub name: String,
    /// Deletes cookies with the given name for the given URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Deletes cookies with the exact domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Deletes cookies with the exact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Deletes cookies with the exact partition key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<CookiePartitionKey>,
}

// =============================================================================
// Events
// =============================================================================

/// Event: Network.requestWillBeSent
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Loader identifier.
    pub loader_id: LoaderId,
    /// URL of the document this request is loaded for.
    pub document_url: String,
    /// Request data.
    pub request: Request,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Wall time (seconds since the UNIX epoch).
    pub wall_time: f64,
    /// Request initiator.
    pub initiator: Initiator,
    /// If this is a redirect, whether the redirected leg had extra info.
    pub redirect_has_extra_info: Option<bool>,
    /// Redirect response data, set when the request is a redirect hop.
    pub redirect_response: Option<Response>,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    /// Frame identifier.
    pub frame_id: Option<String>,
}

/// A cookie attached (or blocked) on a request, as reported by the
/// requestWillBeSentExtraInfo event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedCookie {
    /// The cookie.
    pub cookie: Cookie,
    /// Reasons the cookie was blocked; empty when it was sent.
    pub blocked_reasons: Vec<String>,
}

/// Event: Network.requestWillBeSentExtraInfo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentExtraInfoEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Raw request headers as they will be sent over the wire.
    pub headers: Headers,
    /// Cookies attached to or blocked on this request.
    pub associated_cookies: Option<Vec<AssociatedCookie>>,
}

/// Event: Network.responseReceived
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Loader identifier.
    pub loader_id: LoaderId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Response data.
    pub response: Response,
    /// Whether a matching responseReceivedExtraInfo will be or has been
    /// emitted for this request.
    pub has_extra_info: bool,
    /// Frame identifier.
    pub frame_id: Option<String>,
}

/// Event: Network.responseReceivedExtraInfo
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedExtraInfoEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Raw response headers as they were received over the wire.
    pub headers: Headers,
    /// The HTTP response status code as seen on the wire.
    pub status_code: Option<i64>,
}

/// Event: Network.loadingFailed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    /// Error message.
    pub error_text: String,
    /// True if loading was canceled.
    pub canceled: Option<bool>,
    /// The reason why loading was blocked, if any.
    pub blocked_reason: Option<String>,
}

/// Event: Network.loadingFinished
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinishedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Total number of bytes received for this request.
    pub encoded_data_length: f64,
}

/// Event: Network.requestServedFromCache
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestServedFromCacheEvent {
    /// Request identifier.
    pub request_id: RequestId,
}

#[cfg(test)]
mod tests;
