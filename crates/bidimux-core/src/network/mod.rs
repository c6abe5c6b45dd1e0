//! Network request mediation.
//!
//! One [`NetworkRequest`] joins the four CDP events that describe a
//! logical HTTP request and decides when the BiDi events are complete
//! enough to emit. Fetch interception hooks into the same machine: a
//! paused request emits its phase event with `isBlocked: true` and stalls
//! until a continuation command clears the phase.

pub mod headers;
pub mod storage;
pub mod url_pattern;

use serde_json::json;
use tracing::{debug, trace};

use bidimux_cdp::protocol::fetch::RequestPausedEvent;
use bidimux_cdp::protocol::network::{
    RequestWillBeSentEvent, RequestWillBeSentExtraInfoEvent, ResponseReceivedEvent,
    ResponseReceivedExtraInfoEvent, Response as CdpResponse,
};

use crate::protocol::message::{EventMessage, now_ms};
use crate::protocol::network::{
    AuthChallenge, BaseParameters, BeforeRequestSent, FetchError, FetchTimingInfo, Initiator,
    InterceptPhase, RequestData, ResponseContent, ResponseData, ResponseEvent,
};
use crate::wait::Deferred;

use headers::{headers_from_cdp, headers_size};

/// The interception state of a paused request.
#[derive(Debug, Clone)]
pub struct Interception {
    /// Phase the request is paused at.
    pub phase: InterceptPhase,
    /// The Fetch-domain request id used by continuation commands.
    pub fetch_request_id: String,
    /// Intercepts that matched this pause.
    pub intercepts: Vec<String>,
}

/// One logical HTTP request, possibly spanning redirects.
#[derive(Debug)]
pub struct NetworkRequest {
    request_id: String,
    context_id: Option<String>,
    navigation_id: Option<String>,
    /// Session of the owning target; a back-reference, not ownership.
    session_id: Option<String>,
    redirect_count: u64,
    request: Option<RequestWillBeSentEvent>,
    request_extra: Option<RequestWillBeSentExtraInfoEvent>,
    response: Option<ResponseReceivedEvent>,
    response_extra: Option<ResponseReceivedExtraInfoEvent>,
    served_from_cache: bool,
    loading_finished: bool,
    interception: Option<Interception>,
    before_sent_emitted: bool,
    response_started_emitted: bool,
    response_completed_emitted: bool,
    /// Resolves when `beforeRequestSent` was emitted for the current leg.
    pub before_request_sent: Deferred<std::result::Result<(), String>>,
    /// Resolves when `responseCompleted` was emitted for the current leg.
    pub response_completed: Deferred<std::result::Result<(), String>>,
}

impl NetworkRequest {
    /// Create the bookkeeping for a CDP request id.
    pub fn new(
        request_id: impl Into<String>,
        context_id: Option<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            context_id,
            navigation_id: None,
            session_id,
            redirect_count: 0,
            request: None,
            request_extra: None,
            response: None,
            response_extra: None,
            served_from_cache: false,
            loading_finished: false,
            interception: None,
            before_sent_emitted: false,
            response_started_emitted: false,
            response_completed_emitted: false,
            before_request_sent: Deferred::new(),
            response_completed: Deferred::new(),
        }
    }

    /// The BiDi request id (the CDP network request id).
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The browsing context the request belongs to.
    pub fn context_id(&self) -> Option<&str> {
        self.context_id.as_deref()
    }

    /// The owning target's session.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The request URL, as far as known.
    pub fn url(&self) -> Option<&str> {
        self.request.as_ref().map(|r| r.request.url.as_str())
    }

    /// The current interception state.
    pub fn interception(&self) -> Option<&Interception> {
        self.interception.as_ref()
    }

    /// Clear the interception phase; continuation commands call this.
    pub fn clear_interception(&mut self) -> Option<Interception> {
        self.interception.take()
    }

    /// Whether the request is currently paused.
    pub fn is_blocked(&self) -> bool {
        self.interception.is_some()
    }

    // =========================================================================
    // CDP event intake
    // =========================================================================

    /// Network.requestWillBeSent; `navigation_id` is the mediator-minted
    /// navigation this request loads for, when known.
    pub fn on_request_will_be_sent(
        &mut self,
        event: RequestWillBeSentEvent,
        navigation_id: Option<String>,
    ) -> Vec<EventMessage> {
        let mut events = Vec::new();

        if self.request.is_some() {
            if let Some(redirect_response) = event.redirect_response.clone() {
                events.extend(self.flush_redirect_leg(&event, redirect_response));
            }
        }

        self.navigation_id = navigation_id.or(self.navigation_id.take());
        self.request = Some(event);
        events.extend(self.ready_events(false));
        events
    }

    /// Close the previous leg of a redirect chain before the new leg's
    /// request info replaces it.
    fn flush_redirect_leg(
        &mut self,
        event: &RequestWillBeSentEvent,
        redirect_response: CdpResponse,
    ) -> Vec<EventMessage> {
        debug!(request = %self.request_id, leg = self.redirect_count, "Flushing redirect leg");

        self.response = Some(ResponseReceivedEvent {
            request_id: event.request_id.clone(),
            loader_id: event.loader_id.clone(),
            timestamp: event.timestamp,
            resource_type: event
                .resource_type
                .unwrap_or(bidimux_cdp::protocol::network::ResourceType::Other),
            response: redirect_response,
            has_extra_info: event.redirect_has_extra_info.unwrap_or(false),
            frame_id: event.frame_id.clone(),
        });

        let events = self.ready_events(true);

        // Start the next leg with fresh slots and fresh completion
        // latches; the BiDi request id stays the same.
        self.redirect_count += 1;
        self.request = None;
        self.request_extra = None;
        self.response = None;
        self.response_extra = None;
        self.served_from_cache = false;
        self.loading_finished = false;
        self.before_sent_emitted = false;
        self.response_started_emitted = false;
        self.response_completed_emitted = false;
        self.before_request_sent = Deferred::new();
        self.response_completed = Deferred::new();
        events
    }

    /// Network.requestWillBeSentExtraInfo.
    pub fn on_request_extra_info(
        &mut self,
        event: RequestWillBeSentExtraInfoEvent,
    ) -> Vec<EventMessage> {
        self.request_extra = Some(event);
        self.ready_events(false)
    }

    /// Network.requestServedFromCache.
    pub fn on_served_from_cache(&mut self) -> Vec<EventMessage> {
        self.served_from_cache = true;
        // Cached responses come with extra-info events describing the
        // original network fetch; they do not apply to this delivery.
        self.response_extra = None;
        self.ready_events(false)
    }

    /// Network.responseReceived.
    pub fn on_response_received(&mut self, event: ResponseReceivedEvent) -> Vec<EventMessage> {
        self.response = Some(event);
        self.ready_events(false)
    }

    /// Network.responseReceivedExtraInfo.
    pub fn on_response_extra_info(
        &mut self,
        event: ResponseReceivedExtraInfoEvent,
    ) -> Vec<EventMessage> {
        if self.served_from_cache {
            trace!(request = %self.request_id, "Dropping extra info for cached response");
            return Vec::new();
        }
        self.response_extra = Some(event);
        self.ready_events(false)
    }

    /// Network.loadingFinished.
    pub fn on_loading_finished(&mut self) -> Vec<EventMessage> {
        self.loading_finished = true;
        self.ready_events(false)
    }

    /// Network.loadingFailed; produces `network.fetchError`.
    pub fn on_loading_failed(&mut self, error_text: &str) -> Vec<EventMessage> {
        let mut events = Vec::new();
        // The error event presumes the request was announced.
        if !self.before_sent_emitted && self.request.is_some() {
            events.extend(self.ready_events(true));
        }
        if self.request.is_some() {
            events.push(EventMessage::new(
                "network.fetchError",
                json!(FetchError {
                    base: self.base_parameters(),
                    error_text: error_text.to_string(),
                }),
            ));
        }
        self.before_request_sent
            .resolve(Err(error_text.to_string()));
        self.response_completed
            .resolve(Err(error_text.to_string()));
        events
    }

    /// Fetch.requestPaused at the request or response stage.
    pub fn on_request_paused(
        &mut self,
        event: &RequestPausedEvent,
        intercepts: Vec<String>,
    ) -> Vec<EventMessage> {
        let phase = pause_phase(event);

        self.interception = Some(Interception {
            phase,
            fetch_request_id: event.request_id.clone(),
            intercepts,
        });

        // A response-stage pause may precede the Network-domain response
        // event; synthesize the response from the paused data.
        if phase == InterceptPhase::ResponseStarted && self.response.is_none() {
            self.response = Some(response_from_paused(event));
        }

        self.ready_events(false)
    }

    /// Fetch.authRequired; produces `network.authRequired`.
    pub fn on_auth_required(
        &mut self,
        fetch_request_id: &str,
        challenge_scheme: &str,
        challenge_realm: &str,
        intercepts: Vec<String>,
    ) -> Vec<EventMessage> {
        self.interception = Some(Interception {
            phase: InterceptPhase::AuthRequired,
            fetch_request_id: fetch_request_id.to_string(),
            intercepts,
        });

        let mut events = Vec::new();
        if !self.before_sent_emitted && self.request.is_some() {
            events.extend(self.ready_events(true));
        }

        let mut response = self
            .response
            .as_ref()
            .map(|r| self.response_data(r))
            .unwrap_or_else(|| empty_response_data(self.url().unwrap_or_default()));
        response.status = 401;
        response.status_text = "Unauthorized".to_string();
        response.auth_challenges = Some(vec![AuthChallenge {
            scheme: challenge_scheme.to_string(),
            realm: challenge_realm.to_string(),
        }]);

        events.push(EventMessage::new(
            "network.authRequired",
            json!(crate::protocol::network::AuthRequired {
                base: self.base_parameters(),
                response,
            }),
        ));
        events
    }

    /// Resolve everything with an error; used when the storage disposes
    /// the request.
    pub fn dispose(&mut self) {
        const DETACHED: &str = "Network processor detached";
        self.before_request_sent.resolve(Err(DETACHED.to_string()));
        self.response_completed.resolve(Err(DETACHED.to_string()));
    }

    // =========================================================================
    // Emission rules
    // =========================================================================

    /// Whether `beforeRequestSent` has all the data it waits for.
    fn before_ready(&self, flushing: bool) -> bool {
        self.request.is_some()
            && (self.request_extra.is_some()
                || self.served_from_cache
                || self.response.as_ref().is_some_and(|r| !r.has_extra_info)
                || self
                    .interception
                    .as_ref()
                    .is_some_and(|i| i.phase == InterceptPhase::BeforeRequestSent)
                || flushing)
    }

    /// Whether response events have all the data they wait for.
    fn response_ready(&self, flushing: bool) -> bool {
        self.response.is_some()
            && (self.response_extra.is_some()
                || self.served_from_cache
                || self.response.as_ref().is_some_and(|r| !r.has_extra_info)
                || self
                    .interception
                    .as_ref()
                    .is_some_and(|i| i.phase == InterceptPhase::ResponseStarted)
                || flushing)
    }

    /// Emit whatever became complete, preserving the per-request order
    /// `beforeRequestSent` → `responseStarted` → `responseCompleted`.
    fn ready_events(&mut self, flushing: bool) -> Vec<EventMessage> {
        let mut events = Vec::new();

        if !self.before_sent_emitted && self.before_ready(flushing) {
            self.before_sent_emitted = true;
            self.before_request_sent.resolve(Ok(()));
            events.push(EventMessage::new(
                "network.beforeRequestSent",
                json!(BeforeRequestSent {
                    base: self.base_parameters(),
                    initiator: self.initiator(),
                }),
            ));
        }

        if self.before_sent_emitted
            && !self.response_started_emitted
            && self.response_ready(flushing)
        {
            self.response_started_emitted = true;
            let response = self.response.clone().expect("response_ready checked");
            events.push(EventMessage::new(
                "network.responseStarted",
                json!(ResponseEvent {
                    base: self.base_parameters(),
                    response: self.response_data(&response),
                }),
            ));
        }

        if self.response_started_emitted
            && !self.response_completed_emitted
            && (self.loading_finished || flushing)
            && self.response_ready(flushing)
        {
            self.response_completed_emitted = true;
            self.response_completed.resolve(Ok(()));
            let response = self.response.clone().expect("response_ready checked");
            events.push(EventMessage::new(
                "network.responseCompleted",
                json!(ResponseEvent {
                    base: self.base_parameters(),
                    response: self.response_data(&response),
                }),
            ));
        }

        events
    }

    // =========================================================================
    // Payload builders
    // =========================================================================

    fn base_parameters(&self) -> BaseParameters {
        let request = self.request.as_ref();

        let headers = match (&self.request_extra, request) {
            (Some(extra), _) => headers_from_cdp(&extra.headers),
            (None, Some(request)) => headers_from_cdp(&request.request.headers),
            (None, None) => Vec::new(),
        };
        let cookies = self
            .request_extra
            .as_ref()
            .and_then(|extra| extra.associated_cookies.as_ref())
            .map(|cookies| {
                cookies
                    .iter()
                    .filter(|c| c.blocked_reasons.is_empty())
                    .map(|c| headers::cookie_from_cdp(&c.cookie))
                    .collect()
            })
            .unwrap_or_default();

        let url = request
            .map(|r| {
                let fragment = r.request.url_fragment.as_deref().unwrap_or("");
                format!("{}{fragment}", r.request.url)
            })
            .unwrap_or_default();

        let interception = self.interception.as_ref();
        BaseParameters {
            context: self.context_id.clone(),
            is_blocked: interception.is_some(),
            navigation: self.navigation_id.clone(),
            redirect_count: self.redirect_count,
            request: RequestData {
                request: self.request_id.clone(),
                url,
                method: request
                    .map(|r| r.request.method.clone())
                    .unwrap_or_default(),
                headers_size: headers_size(&headers),
                headers,
                cookies,
                body_size: None,
                timings: self.timings(),
            },
            timestamp: now_ms(),
            intercepts: interception
                .filter(|i| !i.intercepts.is_empty())
                .map(|i| i.intercepts.clone()),
        }
    }

    fn initiator(&self) -> Initiator {
        self.request
            .as_ref()
            .map(|r| Initiator {
                initiator_type: Some(r.initiator.initiator_type.clone()),
                column_number: r.initiator.column_number.map(|c| c as u64),
                line_number: r.initiator.line_number.map(|l| l as u64),
                request: None,
            })
            .unwrap_or_default()
    }

    fn timings(&self) -> FetchTimingInfo {
        self.request
            .as_ref()
            .map(|r| FetchTimingInfo {
                time_origin: r.wall_time * 1000.0,
                request_time: r.timestamp,
                ..FetchTimingInfo::default()
            })
            .unwrap_or_default()
    }

    fn response_data(&self, event: &ResponseReceivedEvent) -> ResponseData {
        let extra = self.response_extra.as_ref();
        let headers = match extra {
            Some(extra) => headers_from_cdp(&extra.headers),
            None => headers_from_cdp(&event.response.headers),
        };
        let status = extra
            .and_then(|e| e.status_code)
            .unwrap_or(event.response.status)
            .max(0) as u64;
        let bytes_received = event.response.encoded_data_length.unwrap_or(0.0).max(0.0) as u64;

        ResponseData {
            url: event.response.url.clone(),
            protocol: event.response.protocol.clone().unwrap_or_default(),
            status,
            status_text: event.response.status_text.clone(),
            from_cache: self.served_from_cache
                || event.response.from_disk_cache.unwrap_or(false),
            headers_size: Some(headers_size(&headers)),
            headers,
            mime_type: event.response.mime_type.clone(),
            bytes_received,
            body_size: None,
            content: ResponseContent { size: 0 },
            auth_challenges: None,
        }
    }
}

/// The interception phase a Fetch pause represents.
///
/// No response data means the request stage; a 401 with the Unauthorized
/// phrase is an authentication challenge; everything else is the response
/// stage.
pub fn pause_phase(event: &RequestPausedEvent) -> InterceptPhase {
    if event.response_status_code.is_none() && event.response_error_reason.is_none() {
        InterceptPhase::BeforeRequestSent
    } else if event.response_status_code == Some(401)
        && event.response_status_text.as_deref() == Some("Unauthorized")
    {
        InterceptPhase::AuthRequired
    } else {
        InterceptPhase::ResponseStarted
    }
}

/// Synthesize a Network-domain response from a response-stage pause.
fn response_from_paused(event: &RequestPausedEvent) -> ResponseReceivedEvent {
    let mut headers = bidimux_cdp::protocol::network::Headers::new();
    for entry in event.response_headers.iter().flatten() {
        headers.insert(entry.name.clone(), json!(entry.value));
    }
    ResponseReceivedEvent {
        request_id: event.network_id.clone().unwrap_or_else(|| event.request_id.clone()),
        loader_id: String::new(),
        timestamp: 0.0,
        resource_type: event.resource_type,
        response: CdpResponse {
            url: event.request.url.clone(),
            status: event.response_status_code.unwrap_or(0),
            status_text: event.response_status_text.clone().unwrap_or_default(),
            headers,
            mime_type: String::new(),
            protocol: None,
            remote_ip_address: None,
            remote_port: None,
            from_disk_cache: None,
            from_service_worker: None,
            encoded_data_length: None,
        },
        has_extra_info: false,
        frame_id: Some(event.frame_id.clone()),
    }
}

/// Empty response shell used when an auth challenge arrives before any
/// response data.
fn empty_response_data(url: &str) -> ResponseData {
    ResponseData {
        url: url.to_string(),
        protocol: String::new(),
        status: 0,
        status_text: String::new(),
        from_cache: false,
        headers: Vec::new(),
        mime_type: String::new(),
        bytes_received: 0,
        headers_size: Some(0),
        body_size: None,
        content: ResponseContent { size: 0 },
        auth_challenges: None,
    }
}

#[cfg(test)]
mod tests;
