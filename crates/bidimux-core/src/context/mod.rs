//! Browsing contexts: the frame tree and its navigation behavior.

pub mod navigation;
pub mod storage;

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, instrument, trace};

use bidimux_cdp::protocol::page::{
    DialogType, NavigateParams as CdpNavigateParams, NavigateResult as CdpNavigateResult,
    ReloadParams as CdpReloadParams,
};

use crate::error::{Error, Result};
use crate::event::{EventManager, EventScope};
use crate::protocol::browsing_context::{NavigateResult, NavigationInfo, ReadinessState};
use crate::protocol::message::{EventMessage, now_ms};
use crate::target::CdpTarget;
use crate::wait::Deferred;

use navigation::{NavigationEvent, NavigationOutcome, NavigationState, NavigationTracker};

/// Message used when disposal cancels outstanding lifecycle waits.
const NAVIGATION_CANCELED: &str = "navigation canceled";

/// Mutable per-context state behind one lock.
#[derive(Debug)]
struct ContextState {
    url: String,
    children: Vec<String>,
    tracker: NavigationTracker,
    /// Resolves when DOMContentLoaded fires for the current document.
    dom_content_loaded: Deferred<std::result::Result<(), String>>,
    /// Resolves when load fires for the current document.
    load: Deferred<std::result::Result<(), String>>,
    /// Resolves with the realm id of the first default execution context
    /// of the current document.
    default_realm: Deferred<String>,
    /// Viewport override currently applied, kept for re-application.
    viewport_override: Option<(u64, u64)>,
    /// Device pixel ratio override currently applied.
    device_pixel_ratio_override: Option<f64>,
    /// Kind of the prompt currently or last shown.
    last_prompt: Option<DialogType>,
    /// The target the context currently lives on.
    target: Arc<CdpTarget>,
}

/// One node of the browsing-context tree.
///
/// The id, parentage and user context are fixed at creation; navigation
/// state, children and the backing CDP target change over the context's
/// lifetime. OOPiF adoption swaps the target via [`Self::update_cdp_target`].
#[derive(Debug)]
pub struct BrowsingContext {
    id: String,
    parent_id: Option<String>,
    top_level_id: String,
    user_context: String,
    original_opener: Option<String>,
    event_manager: EventManager,
    state: Mutex<ContextState>,
}

impl BrowsingContext {
    /// Create a context node.
    pub fn new(
        id: impl Into<String>,
        parent_id: Option<String>,
        top_level_id: impl Into<String>,
        user_context: impl Into<String>,
        original_opener: Option<String>,
        url: impl Into<String>,
        target: Arc<CdpTarget>,
        event_manager: EventManager,
    ) -> Arc<Self> {
        let url = url.into();
        Arc::new(Self {
            id: id.into(),
            parent_id,
            top_level_id: top_level_id.into(),
            user_context: user_context.into(),
            original_opener,
            event_manager,
            state: Mutex::new(ContextState {
                tracker: NavigationTracker::new(url.clone()),
                url,
                children: Vec::new(),
                dom_content_loaded: Deferred::new(),
                load: Deferred::new(),
                default_realm: Deferred::new(),
                viewport_override: None,
                device_pixel_ratio_override: None,
                last_prompt: None,
                target,
            }),
        })
    }

    /// Context id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parent context id; `None` on top-level contexts.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Top-level ancestor id (the context's own id when top-level).
    pub fn top_level_id(&self) -> &str {
        &self.top_level_id
    }

    /// Whether this is a top-level context.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The user context this context belongs to.
    pub fn user_context(&self) -> &str {
        &self.user_context
    }

    /// The context that opened this one, if any.
    pub fn original_opener(&self) -> Option<&str> {
        self.original_opener.as_deref()
    }

    /// The event scope of this context.
    pub fn event_scope(&self) -> EventScope {
        EventScope {
            context: Some(self.id.clone()),
            top_level_context: Some(self.top_level_id.clone()),
            user_context: Some(self.user_context.clone()),
        }
    }

    /// Current document URL.
    pub async fn url(&self) -> String {
        self.state.lock().await.url.clone()
    }

    /// Child context ids in creation order.
    pub async fn children(&self) -> Vec<String> {
        self.state.lock().await.children.clone()
    }

    /// Register a child context.
    pub async fn add_child(&self, child_id: &str) {
        let mut state = self.state.lock().await;
        if !state.children.iter().any(|c| c == child_id) {
            state.children.push(child_id.to_string());
        }
    }

    /// Remove a child context.
    pub async fn remove_child(&self, child_id: &str) {
        self.state.lock().await.children.retain(|c| c != child_id);
    }

    /// The target currently backing this context.
    pub async fn target(&self) -> Arc<CdpTarget> {
        self.state.lock().await.target.clone()
    }

    /// Replace the backing target (OOPiF adoption).
    pub async fn update_cdp_target(&self, target: Arc<CdpTarget>) {
        debug!(context = %self.id, target = %target.target_id(), "Context target replaced");
        self.state.lock().await.target = target;
    }

    /// The current navigation id, stable across same-document navigations.
    pub async fn current_navigation_id(&self) -> String {
        self.state
            .lock()
            .await
            .tracker
            .current_navigation_id()
            .to_string()
    }

    /// The navigation id a loader belongs to, if the loader is known.
    pub async fn navigation_for_loader(&self, loader_id: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .tracker
            .navigation_for_loader(loader_id)
            .map(|n| n.id.clone())
    }

    /// The URL a navigate command is currently steering towards.
    pub async fn pending_navigation_url(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .tracker
            .pending_url()
            .map(str::to_string)
    }

    /// Await the default realm of the current document.
    pub async fn default_realm(&self) -> String {
        let deferred = self.state.lock().await.default_realm.clone();
        deferred.wait().await
    }

    /// Resolve the default-realm latch for the current document.
    pub async fn set_default_realm(&self, realm_id: &str) {
        self.state
            .lock()
            .await
            .default_realm
            .resolve(realm_id.to_string());
    }

    /// Reset the default-realm latch (execution contexts cleared).
    pub async fn clear_default_realm(&self) {
        self.state.lock().await.default_realm = Deferred::new();
    }

    /// The viewport override state: (viewport, devicePixelRatio).
    pub async fn viewport_overrides(&self) -> (Option<(u64, u64)>, Option<f64>) {
        let state = self.state.lock().await;
        (state.viewport_override, state.device_pixel_ratio_override)
    }

    /// Record the applied viewport override state.
    pub async fn set_viewport_overrides(
        &self,
        viewport: Option<(u64, u64)>,
        device_pixel_ratio: Option<f64>,
    ) {
        let mut state = self.state.lock().await;
        state.viewport_override = viewport;
        state.device_pixel_ratio_override = device_pixel_ratio;
    }

    /// The prompt kind currently or last shown.
    pub async fn last_prompt(&self) -> Option<DialogType> {
        self.state.lock().await.last_prompt
    }

    /// Record an opened prompt.
    pub async fn set_last_prompt(&self, prompt: DialogType) {
        self.state.lock().await.last_prompt = Some(prompt);
    }

    // =========================================================================
    // CDP event handlers
    // =========================================================================

    /// CDP Page.frameStartedNavigating for this frame.
    pub async fn on_frame_started_navigating(&self, loader_id: &str, url: &str) {
        let events = {
            let mut state = self.state.lock().await;
            // A fresh document is on the way: outstanding lifecycle waits
            // belong to the navigation that owns them.
            state.dom_content_loaded = Deferred::new();
            state.load = Deferred::new();
            state.tracker.frame_started_navigating(loader_id, url)
        };
        self.emit_navigation_events(events).await;
    }

    /// CDP Page.frameNavigated for this frame.
    pub async fn on_frame_navigated(&self, loader_id: &str, url: &str) {
        let events = {
            let mut state = self.state.lock().await;
            state.url = url.to_string();
            state.tracker.frame_navigated(loader_id, url)
        };
        self.emit_navigation_events(events).await;
    }

    /// CDP Page.navigatedWithinDocument for this frame.
    pub async fn on_navigated_within_document(&self, url: &str, navigation_type: Option<&str>) {
        let events = {
            let mut state = self.state.lock().await;
            state.url = url.to_string();
            match navigation_type {
                Some("fragment") | None => state.tracker.fragment_navigated(url),
                _ => {
                    state.tracker.history_updated(url);
                    Vec::new()
                }
            }
        };
        self.emit_navigation_events(events).await;
    }

    /// CDP Page.lifecycleEvent for this frame.
    pub async fn on_lifecycle_event(&self, name: &str, loader_id: &str) {
        let (navigation, url) = {
            let state = self.state.lock().await;
            let Some(navigation) = state.tracker.navigation_for_loader(loader_id) else {
                trace!(context = %self.id, loader = %loader_id, "Lifecycle event for unknown loader");
                return;
            };
            // Stale loaders get their deferreds resolved but no events.
            let current = state.tracker.current().loader_id.as_deref() == Some(loader_id);
            match name {
                "DOMContentLoaded" => {
                    if current {
                        state.dom_content_loaded.resolve(Ok(()));
                    }
                }
                "load" => {
                    if current {
                        state.load.resolve(Ok(()));
                    }
                }
                _ => return,
            }
            if !current {
                return;
            }
            (navigation.id.clone(), state.url.clone())
        };

        let method = match name {
            "DOMContentLoaded" => "browsingContext.domContentLoaded",
            "load" => {
                self.state.lock().await.tracker.load_fired(loader_id);
                "browsingContext.load"
            }
            _ => unreachable!("filtered above"),
        };
        self.emit_navigation_info(method, Some(navigation), url).await;
    }

    /// Network-level loading failure for a known loader.
    pub async fn on_loading_failed(&self, loader_id: &str, error_text: &str) {
        let events = {
            let mut state = self.state.lock().await;
            let url = state.url.clone();
            state
                .dom_content_loaded
                .resolve(Err(error_text.to_string()));
            state.load.resolve(Err(error_text.to_string()));
            state.tracker.loading_failed(loader_id, &url)
        };
        self.emit_navigation_events(events).await;
    }

    /// Cancel all pending waits; called when the context is disposed.
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        state
            .dom_content_loaded
            .resolve(Err(NAVIGATION_CANCELED.to_string()));
        state.load.resolve(Err(NAVIGATION_CANCELED.to_string()));
        state.tracker.dispose();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Drive `browsingContext.navigate`.
    #[instrument(level = "debug", skip(self), fields(context = %self.id, url = %url))]
    pub async fn navigate(&self, url: &str, wait: ReadinessState) -> Result<NavigateResult> {
        let target = self.target().await;
        target.wait_unblocked().await?;

        let (pending, aborted) = {
            let mut state = self.state.lock().await;
            state.tracker.create_pending_navigation(url)
        };
        self.emit_navigation_events(aborted).await;

        let result: CdpNavigateResult = target
            .session()
            .send(
                "Page.navigate",
                Some(CdpNavigateParams {
                    url: url.to_string(),
                    referrer: None,
                    transition_type: None,
                    frame_id: Some(self.id.clone()),
                }),
            )
            .await
            .map_err(Error::from)?;

        if let Some(error_text) = result.error_text {
            pending.finished.resolve(NavigationOutcome::Failed);
            return Err(Error::unknown(error_text));
        }

        if wait == ReadinessState::None {
            return Ok(NavigateResult {
                navigation: Some(pending.id),
                url: url.to_string(),
            });
        }

        // Same-document navigations never see lifecycle events; the
        // navigation's own terminal state is all there is to await.
        if result.loader_id.is_none() {
            return self.finish_navigation(pending, url).await;
        }

        let lifecycle = {
            let state = self.state.lock().await;
            match wait {
                ReadinessState::Interactive => state.dom_content_loaded.clone(),
                ReadinessState::Complete => state.load.clone(),
                ReadinessState::None => unreachable!("handled above"),
            }
        };

        tokio::select! {
            outcome = pending.finished.wait() => match outcome {
                NavigationOutcome::Load | NavigationOutcome::Fragment => Ok(NavigateResult {
                    navigation: Some(pending.id),
                    url: url.to_string(),
                }),
                NavigationOutcome::Aborted => Err(Error::unknown("navigation aborted")),
                NavigationOutcome::Failed => Err(Error::unknown("navigation failed")),
            },
            result = lifecycle.wait() => match result {
                Ok(()) => Ok(NavigateResult {
                    navigation: Some(pending.id),
                    url: url.to_string(),
                }),
                Err(message) => Err(Error::unknown(message)),
            },
        }
    }

    /// Drive `browsingContext.reload`.
    #[instrument(level = "debug", skip(self), fields(context = %self.id))]
    pub async fn reload(&self, ignore_cache: bool, wait: ReadinessState) -> Result<NavigateResult> {
        let target = self.target().await;
        target.wait_unblocked().await?;

        let url = self.url().await;
        let (pending, aborted) = {
            let mut state = self.state.lock().await;
            state.tracker.create_pending_navigation(url.clone())
        };
        self.emit_navigation_events(aborted).await;

        target
            .session()
            .send_unit(
                "Page.reload",
                Some(CdpReloadParams {
                    ignore_cache: Some(ignore_cache),
                }),
            )
            .await
            .map_err(Error::from)?;

        if wait == ReadinessState::None {
            return Ok(NavigateResult {
                navigation: Some(pending.id),
                url,
            });
        }

        let lifecycle = {
            let state = self.state.lock().await;
            match wait {
                ReadinessState::Interactive => state.dom_content_loaded.clone(),
                ReadinessState::Complete => state.load.clone(),
                ReadinessState::None => unreachable!("handled above"),
            }
        };

        tokio::select! {
            outcome = pending.finished.wait() => match outcome {
                NavigationOutcome::Load | NavigationOutcome::Fragment => Ok(NavigateResult {
                    navigation: Some(pending.id),
                    url,
                }),
                NavigationOutcome::Aborted => Err(Error::unknown("navigation aborted")),
                NavigationOutcome::Failed => Err(Error::unknown("navigation failed")),
            },
            result = lifecycle.wait() => match result {
                Ok(()) => Ok(NavigateResult {
                    navigation: Some(pending.id),
                    url,
                }),
                Err(message) => Err(Error::unknown(message)),
            },
        }
    }

    async fn finish_navigation(
        &self,
        pending: NavigationState,
        url: &str,
    ) -> Result<NavigateResult> {
        match pending.finished.wait().await {
            NavigationOutcome::Load | NavigationOutcome::Fragment => Ok(NavigateResult {
                navigation: Some(pending.id),
                url: url.to_string(),
            }),
            NavigationOutcome::Aborted => Err(Error::unknown("navigation aborted")),
            NavigationOutcome::Failed => Err(Error::unknown("navigation failed")),
        }
    }

    // =========================================================================
    // Event emission
    // =========================================================================

    async fn emit_navigation_events(&self, events: Vec<NavigationEvent>) {
        for event in events {
            let (method, navigation, url) = match event {
                NavigationEvent::Started { navigation, url } => {
                    ("browsingContext.navigationStarted", navigation, url)
                }
                NavigationEvent::Committed { navigation, url } => {
                    ("browsingContext.navigationCommitted", navigation, url)
                }
                NavigationEvent::Fragment { navigation, url } => {
                    ("browsingContext.fragmentNavigated", navigation, url)
                }
                NavigationEvent::Aborted { navigation, url } => {
                    ("browsingContext.navigationAborted", navigation, url)
                }
                NavigationEvent::Failed { navigation, url } => {
                    ("browsingContext.navigationFailed", navigation, url)
                }
            };
            self.emit_navigation_info(method, Some(navigation), url).await;
        }
    }

    async fn emit_navigation_info(&self, method: &str, navigation: Option<String>, url: String) {
        let info = NavigationInfo {
            context: self.id.clone(),
            navigation,
            timestamp: now_ms(),
            url,
        };
        self.event_manager
            .register_event(
                EventMessage::new(method, json!(info)),
                self.event_scope(),
            )
            .await;
    }
}

#[cfg(test)]
mod tests;
