//! Attached CDP target lifecycle.
//!
//! Every attached target (page, OOPiF, worker) gets a [`CdpTarget`]: the
//! session client, the per-target domain enablement state and the
//! *unblocked* latch. Commands routed at the target await the latch, which
//! resolves once all required CDP domains are enabled and the target was
//! released from its debugger pause.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bidimux_cdp::CdpSession;
use bidimux_cdp::protocol::fetch::{
    DisableParams as FetchDisableParams, EnableParams as FetchEnableParams, RequestPattern,
};
use bidimux_cdp::protocol::network::{
    DisableParams as NetworkDisableParams, EnableParams as NetworkEnableParams,
};
use bidimux_cdp::protocol::page::{EnableParams as PageEnableParams, SetLifecycleEventsEnabledParams};
use bidimux_cdp::protocol::runtime::{
    EnableParams as RuntimeEnableParams, RunIfWaitingForDebuggerParams,
};
use bidimux_cdp::protocol::security::SetIgnoreCertificateErrorsParams;
use bidimux_cdp::protocol::target_domain::SetAutoAttachParams;

use crate::error::{Error, Result};
use crate::event::{EventManager, EventScope};
use crate::protocol::message::EventMessage;
use crate::wait::Deferred;

/// A preload script to install while the target is still paused.
#[derive(Debug, Clone)]
pub struct PreloadSpec {
    /// BiDi preload script id.
    pub script_id: String,
    /// Wrapped script source.
    pub source: String,
    /// Sandbox to install into, if any.
    pub sandbox: Option<String>,
}

/// Current Fetch domain state of the target.
#[derive(Debug, Default)]
struct FetchState {
    enabled: bool,
}

/// One attached browser target.
#[derive(Debug)]
pub struct CdpTarget {
    target_id: String,
    target_type: String,
    session: CdpSession,
    browser_session: CdpSession,
    /// Resolves with Ok once the init sequence ran, or with the failure
    /// message when it did not.
    unblocked: Deferred<std::result::Result<(), String>>,
    network_enabled: AtomicBool,
    fetch: Mutex<FetchState>,
    accept_insecure_certs: bool,
}

impl CdpTarget {
    /// Create a target whose unblocked latch is still pending.
    pub fn new(
        target_id: impl Into<String>,
        session: CdpSession,
        browser_session: CdpSession,
        accept_insecure_certs: bool,
    ) -> Arc<Self> {
        Self::with_type(target_id, "page", session, browser_session, accept_insecure_certs)
    }

    /// Create a target carrying its CDP target type.
    pub fn with_type(
        target_id: impl Into<String>,
        target_type: impl Into<String>,
        session: CdpSession,
        browser_session: CdpSession,
        accept_insecure_certs: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            target_id: target_id.into(),
            target_type: target_type.into(),
            session,
            browser_session,
            unblocked: Deferred::new(),
            network_enabled: AtomicBool::new(false),
            fetch: Mutex::new(FetchState::default()),
            accept_insecure_certs,
        })
    }

    /// The CDP target id.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// The CDP target type ("page", "iframe", "worker", ...).
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    /// The target's session client.
    pub fn session(&self) -> &CdpSession {
        &self.session
    }

    /// The CDP session id, when attached.
    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id()
    }

    /// The browser-level client on the same connection.
    pub fn browser_session(&self) -> &CdpSession {
        &self.browser_session
    }

    /// Run the per-target init sequence and resolve the unblocked latch.
    ///
    /// Required domains are enabled, globally scoped preload scripts are
    /// installed and the target is released from its debugger pause. A
    /// failure resolves the latch with the error, except for target-closed
    /// races, which count as success.
    ///
    /// Returns the CDP ids of the installed preload scripts.
    pub async fn initialize(
        &self,
        enable_network: bool,
        preload: Vec<PreloadSpec>,
    ) -> Vec<(String, String)> {
        let result = self.run_init_sequence(enable_network, &preload).await;
        match result {
            Ok(installed) => {
                info!(target = %self.target_id, "Target unblocked");
                self.unblocked.resolve(Ok(()));
                installed
            }
            Err(err) if err.is_target_closed() => {
                // Closure races during init are normal shutdown noise.
                debug!(target = %self.target_id, error = %err, "Target closed during init");
                self.unblocked.resolve(Ok(()));
                Vec::new()
            }
            Err(err) => {
                warn!(target = %self.target_id, error = %err, "Target init failed");
                self.unblocked.resolve(Err(err.to_string()));
                Vec::new()
            }
        }
    }

    async fn run_init_sequence(
        &self,
        enable_network: bool,
        preload: &[PreloadSpec],
    ) -> std::result::Result<Vec<(String, String)>, bidimux_cdp::CdpError> {
        let runtime = self
            .session
            .send_unit("Runtime.enable", Some(RuntimeEnableParams::default()));
        let page = self
            .session
            .send_unit("Page.enable", Some(PageEnableParams::default()));
        let lifecycle = self.session.send_unit(
            "Page.setLifecycleEventsEnabled",
            Some(SetLifecycleEventsEnabledParams { enabled: true }),
        );
        let certs = self.session.send_unit(
            "Security.setIgnoreCertificateErrors",
            Some(SetIgnoreCertificateErrorsParams {
                ignore: self.accept_insecure_certs,
            }),
        );
        let auto_attach = self.session.send_unit(
            "Target.setAutoAttach",
            Some(SetAutoAttachParams {
                auto_attach: true,
                wait_for_debugger_on_start: true,
                flatten: Some(true),
            }),
        );

        let (runtime, page, lifecycle, certs, auto_attach) =
            tokio::join!(runtime, page, lifecycle, certs, auto_attach);
        runtime?;
        page?;
        lifecycle?;
        certs?;
        auto_attach?;

        if enable_network {
            self.toggle_network_if_needed(true).await?;
        }

        let mut installed = Vec::new();
        for spec in preload {
            let result: bidimux_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentResult =
                self.session
                    .send(
                        "Page.addScriptToEvaluateOnNewDocument",
                        Some(
                            bidimux_cdp::protocol::page::AddScriptToEvaluateOnNewDocumentParams {
                                source: spec.source.clone(),
                                world_name: spec.sandbox.clone(),
                                run_immediately: Some(true),
                            },
                        ),
                    )
                    .await?;
            installed.push((spec.script_id.clone(), result.identifier));
        }

        self.session
            .send_unit(
                "Runtime.runIfWaitingForDebugger",
                Some(RunIfWaitingForDebuggerParams::default()),
            )
            .await?;

        Ok(installed)
    }

    /// Await the unblocked latch; a latched init failure fails the caller.
    pub async fn wait_unblocked(&self) -> Result<()> {
        match self.unblocked.wait().await {
            Ok(()) => Ok(()),
            Err(message) => Err(Error::unknown(message)),
        }
    }

    /// Whether the Network domain is enabled on this target.
    pub fn network_enabled(&self) -> bool {
        self.network_enabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the Network domain; repeated calls are no-ops.
    ///
    /// The domain stays enabled while Fetch is active: Fetch interception
    /// relies on network events for request correlation.
    pub async fn toggle_network_if_needed(
        &self,
        enabled: bool,
    ) -> std::result::Result<(), bidimux_cdp::CdpError> {
        if self.network_enabled.load(Ordering::SeqCst) == enabled {
            return Ok(());
        }
        if !enabled && self.fetch.lock().await.enabled {
            return Ok(());
        }

        if enabled {
            self.session
                .send_unit("Network.enable", Some(NetworkEnableParams::default()))
                .await?;
        } else {
            self.session
                .send_unit("Network.disable", Some(NetworkDisableParams::default()))
                .await?;
        }
        self.network_enabled.store(enabled, Ordering::SeqCst);
        debug!(target = %self.target_id, enabled, "Network domain toggled");
        Ok(())
    }

    /// Reconcile the Fetch domain with the wanted intercept patterns.
    ///
    /// Fetch.disable drops every intercept, so the only way to remove one
    /// pattern is disable-then-enable with the remainder; the two commands
    /// never run in parallel. An empty pattern set with no auth handling
    /// leaves the domain disabled.
    pub async fn fetch_apply(
        &self,
        patterns: Vec<RequestPattern>,
        handle_auth_requests: bool,
    ) -> std::result::Result<(), bidimux_cdp::CdpError> {
        let mut fetch = self.fetch.lock().await;

        if fetch.enabled {
            self.session
                .send_unit("Fetch.disable", Some(FetchDisableParams::default()))
                .await?;
            fetch.enabled = false;
        }

        if patterns.is_empty() && !handle_auth_requests {
            debug!(target = %self.target_id, "Fetch domain left disabled");
            return Ok(());
        }

        // Fetch presumes the network domain for request correlation.
        self.toggle_network_if_needed(true).await?;

        self.session
            .send_unit(
                "Fetch.enable",
                Some(FetchEnableParams {
                    patterns: Some(patterns),
                    handle_auth_requests: Some(handle_auth_requests),
                }),
            )
            .await?;
        fetch.enabled = true;
        debug!(target = %self.target_id, "Fetch domain enabled");
        Ok(())
    }

    /// Whether the Fetch domain is currently enabled.
    pub async fn fetch_enabled(&self) -> bool {
        self.fetch.lock().await.enabled
    }

    /// Publish every CDP event of this target's session as a BiDi
    /// `cdp.<event>` event, for clients subscribed to the cdp module.
    pub fn start_cdp_event_bridge(self: &Arc<Self>, event_manager: EventManager) {
        let target = Arc::clone(self);
        let mut events = target.session.subscribe_events();
        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };
                if !target.session.owns_event(&event) {
                    continue;
                }
                let method = format!("cdp.{}", event.method);
                let payload = json!({
                    "event": event.method,
                    "params": event.params,
                    "session": event.session_id,
                });
                event_manager
                    .register_event(EventMessage::new(method, payload), EventScope::global())
                    .await;
            }
        });
    }
}

#[cfg(test)]
mod tests;
