//! The session aggregate: one BiDi client, one browser.

pub mod router;
pub mod user_contexts;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, instrument, warn};

use bidimux_cdp::connection::CdpConnection;
use bidimux_cdp::protocol::target_domain::SetAutoAttachParams;
use bidimux_cdp::CdpSession;

use crate::context::storage::BrowsingContextStorage;
use crate::error::{Error, Result};
use crate::event::{EventManager, EventScope, SubscriptionManager};
use crate::network::storage::NetworkStorage;
use crate::processor;
use crate::protocol::command::Command;
use crate::protocol::message::{CommandFrame, OutgoingMessage};
use crate::queue::ProcessingQueue;
use crate::realm::storage::RealmStorage;
use crate::script::preload::PreloadScriptStorage;
use crate::target::CdpTarget;

pub use user_contexts::{UserContextStorage, DEFAULT_USER_CONTEXT};

/// Everything one mediated session owns.
#[derive(Debug)]
pub(crate) struct SessionInner {
    pub connection: Arc<CdpConnection>,
    pub browser: CdpSession,
    pub queue: ProcessingQueue<OutgoingMessage>,
    pub event_manager: EventManager,
    pub subscriptions: Arc<Mutex<SubscriptionManager>>,
    pub contexts: Arc<BrowsingContextStorage>,
    pub realms: Arc<Mutex<RealmStorage>>,
    pub network: Arc<Mutex<NetworkStorage>>,
    pub preload_scripts: Arc<Mutex<PreloadScriptStorage>>,
    pub user_contexts: Arc<Mutex<UserContextStorage>>,
    /// Attached targets by CDP session id.
    pub targets: Mutex<HashMap<String, Arc<CdpTarget>>>,
    /// Per-context input source state.
    pub input_states: Mutex<crate::processor::input::InputStates>,
}

/// The mediator session: owns the CDP connection, all storages and the
/// ordered outgoing stream.
///
/// The transport front-end feeds raw command frames into
/// [`Self::process_command`] and drains [`OutgoingMessage`]s from the sink
/// it supplied at construction.
#[derive(Debug, Clone)]
pub struct BidiSession {
    inner: Arc<SessionInner>,
}

impl BidiSession {
    /// Build a session over an established CDP connection.
    ///
    /// Outgoing BiDi messages are pushed, in order, into `outgoing`.
    pub fn new(
        connection: Arc<CdpConnection>,
        outgoing: mpsc::UnboundedSender<OutgoingMessage>,
    ) -> Self {
        let browser = CdpSession::browser(connection.clone());
        let queue = ProcessingQueue::new(outgoing);
        let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
        let event_manager = EventManager::new(subscriptions.clone(), queue.clone());

        let session = Self {
            inner: Arc::new(SessionInner {
                connection,
                browser,
                queue,
                event_manager,
                subscriptions,
                contexts: Arc::new(BrowsingContextStorage::new()),
                realms: Arc::new(Mutex::new(RealmStorage::new())),
                network: Arc::new(Mutex::new(NetworkStorage::new())),
                preload_scripts: Arc::new(Mutex::new(PreloadScriptStorage::new())),
                user_contexts: Arc::new(Mutex::new(UserContextStorage::new())),
                targets: Mutex::new(HashMap::new()),
                input_states: Mutex::new(HashMap::new()),
            }),
        };
        router::start(session.clone());
        session
    }

    /// Auto-attach to every current and future browser target.
    ///
    /// # Errors
    ///
    /// Fails when the browser rejects the auto-attach setup.
    pub async fn start(&self) -> Result<()> {
        self.inner
            .browser
            .send_unit(
                "Target.setAutoAttach",
                Some(SetAutoAttachParams {
                    auto_attach: true,
                    wait_for_debugger_on_start: true,
                    flatten: Some(true),
                }),
            )
            .await
            .map_err(Error::from)
    }

    /// Accept one raw command frame.
    ///
    /// The response slot is claimed immediately, so responses leave in
    /// command order even though handlers run concurrently.
    #[instrument(level = "debug", skip_all)]
    pub async fn process_command(&self, raw: &Value) {
        let frame = match CommandFrame::parse(raw) {
            Ok(frame) => frame,
            Err(failure) => {
                warn!(error = %failure.error, "Dropping malformed command frame");
                self.inner
                    .queue
                    .enqueue_ready(OutgoingMessage::error(failure.id, &failure.error, None));
                return;
            }
        };

        let command = match Command::parse(&frame.method, &frame.params) {
            Ok(command) => command,
            Err(error) => {
                self.inner.queue.enqueue_ready(OutgoingMessage::error(
                    Some(frame.id),
                    &error,
                    frame.channel,
                ));
                return;
            }
        };

        debug!(id = frame.id, method = %frame.method, "Command accepted");

        let (done_tx, done_rx) = oneshot::channel::<OutgoingMessage>();
        {
            let id = frame.id;
            let channel = frame.channel.clone();
            self.inner.queue.enqueue(async move {
                done_rx.await.unwrap_or_else(|_| {
                    OutgoingMessage::error(
                        Some(id),
                        &Error::unknown("Command handler dropped its response"),
                        channel,
                    )
                })
            });
        }

        let session = self.clone();
        tokio::spawn(async move {
            let message = match session.dispatch(command).await {
                Ok(result) => OutgoingMessage::success(frame.id, result, frame.channel),
                Err(error) => OutgoingMessage::error(Some(frame.id), &error, frame.channel),
            };
            let _ = done_tx.send(message);
        });
    }

    /// Route one validated command to its module processor.
    pub async fn dispatch(&self, command: Command) -> Result<Value> {
        match command {
            Command::SessionStatus(p) => processor::session::status(self, p).await,
            Command::SessionNew(p) => processor::session::new_session(self, p).await,
            Command::SessionEnd(p) => processor::session::end(self, p).await,
            Command::SessionSubscribe(p) => processor::session::subscribe(self, p).await,
            Command::SessionUnsubscribe(p) => processor::session::unsubscribe(self, p).await,
            Command::SessionUnsubscribeById(p) => {
                processor::session::unsubscribe_by_id(self, p).await
            }

            Command::BrowserClose(p) => processor::browser::close(self, p).await,
            Command::BrowserCreateUserContext(p) => {
                processor::browser::create_user_context(self, p).await
            }
            Command::BrowserRemoveUserContext(p) => {
                processor::browser::remove_user_context(self, p).await
            }
            Command::BrowserGetUserContexts(p) => {
                processor::browser::get_user_contexts(self, p).await
            }
            Command::BrowserGetClientWindows(p) => {
                processor::browser::get_client_windows(self, p).await
            }
            Command::BrowserSetClientWindowState(p) => {
                processor::browser::set_client_window_state(self, p).await
            }

            Command::ContextGetTree(p) => processor::browsing_context::get_tree(self, p).await,
            Command::ContextCreate(p) => processor::browsing_context::create(self, p).await,
            Command::ContextClose(p) => processor::browsing_context::close(self, p).await,
            Command::ContextNavigate(p) => processor::browsing_context::navigate(self, p).await,
            Command::ContextReload(p) => processor::browsing_context::reload(self, p).await,
            Command::ContextActivate(p) => processor::browsing_context::activate(self, p).await,
            Command::ContextHandleUserPrompt(p) => {
                processor::browsing_context::handle_user_prompt(self, p).await
            }
            Command::ContextCaptureScreenshot(p) => {
                processor::browsing_context::capture_screenshot(self, p).await
            }
            Command::ContextPrint(p) => processor::browsing_context::print(self, p).await,
            Command::ContextSetViewport(p) => {
                processor::browsing_context::set_viewport(self, p).await
            }
            Command::ContextTraverseHistory(p) => {
                processor::browsing_context::traverse_history(self, p).await
            }
            Command::ContextLocateNodes(p) => {
                processor::browsing_context::locate_nodes(self, p).await
            }

            Command::ScriptGetRealms(p) => processor::script::get_realms(self, p).await,
            Command::ScriptEvaluate(p) => processor::script::evaluate(self, p).await,
            Command::ScriptCallFunction(p) => processor::script::call_function(self, p).await,
            Command::ScriptDisown(p) => processor::script::disown(self, p).await,
            Command::ScriptAddPreloadScript(p) => {
                processor::script::add_preload_script(self, p).await
            }
            Command::ScriptRemovePreloadScript(p) => {
                processor::script::remove_preload_script(self, p).await
            }

            Command::NetworkAddIntercept(p) => processor::network::add_intercept(self, p).await,
            Command::NetworkRemoveIntercept(p) => {
                processor::network::remove_intercept(self, p).await
            }
            Command::NetworkContinueRequest(p) => {
                processor::network::continue_request(self, p).await
            }
            Command::NetworkContinueResponse(p) => {
                processor::network::continue_response(self, p).await
            }
            Command::NetworkContinueWithAuth(p) => {
                processor::network::continue_with_auth(self, p).await
            }
            Command::NetworkFailRequest(p) => processor::network::fail_request(self, p).await,
            Command::NetworkProvideResponse(p) => {
                processor::network::provide_response(self, p).await
            }
            Command::NetworkSetCacheBehavior(p) => {
                processor::network::set_cache_behavior(self, p).await
            }
            Command::NetworkAddDataCollector(p) => {
                processor::network::add_data_collector(self, p).await
            }
            Command::NetworkRemoveDataCollector(p) => {
                processor::network::remove_data_collector(self, p).await
            }
            Command::NetworkGetData(p) => processor::network::get_data(self, p).await,
            Command::NetworkDisownData(p) => processor::network::disown_data(self, p).await,

            Command::StorageGetCookies(p) => processor::storage::get_cookies(self, p).await,
            Command::StorageSetCookie(p) => processor::storage::set_cookie(self, p).await,
            Command::StorageDeleteCookies(p) => processor::storage::delete_cookies(self, p).await,

            Command::InputPerformActions(p) => processor::input::perform_actions(self, p).await,
            Command::InputReleaseActions(p) => processor::input::release_actions(self, p).await,
            Command::InputSetFiles(p) => processor::input::set_files(self, p).await,

            Command::PermissionsSetPermission(p) => {
                processor::permissions::set_permission(self, p).await
            }

            Command::EmulationSetGeolocationOverride(p) => {
                processor::emulation::set_geolocation_override(self, p).await
            }
            Command::EmulationSetLocaleOverride(p) => {
                processor::emulation::set_locale_override(self, p).await
            }
            Command::EmulationSetScreenOrientationOverride(p) => {
                processor::emulation::set_screen_orientation_override(self, p).await
            }
            Command::EmulationSetTimezoneOverride(p) => {
                processor::emulation::set_timezone_override(self, p).await
            }

            Command::WebExtensionInstall(p) => processor::web_extension::install(self, p).await,
            Command::WebExtensionUninstall(p) => {
                processor::web_extension::uninstall(self, p).await
            }

            Command::BluetoothSimulateAdapter(p) => {
                processor::bluetooth::simulate_adapter(self, p).await
            }
            Command::BluetoothDisableSimulation(p) => {
                processor::bluetooth::disable_simulation(self, p).await
            }
            Command::BluetoothSimulateAdvertisement(p) => {
                processor::bluetooth::simulate_advertisement(self, p).await
            }
            Command::BluetoothSimulatePreconnectedPeripheral(p) => {
                processor::bluetooth::simulate_preconnected_peripheral(self, p).await
            }
            Command::BluetoothHandleRequestDevicePrompt(p) => {
                processor::bluetooth::handle_request_device_prompt(self, p).await
            }

            Command::CdpSendCommand(p) => processor::cdp::send_command(self, p).await,
            Command::CdpGetSession(p) => processor::cdp::get_session(self, p).await,
            Command::CdpResolveRealm(p) => processor::cdp::resolve_realm(self, p).await,
        }
    }

    // =========================================================================
    // Shared accessors for processors and the router
    // =========================================================================

    pub(crate) fn inner(&self) -> &SessionInner {
        &self.inner
    }

    /// The browser-level CDP client.
    pub fn browser(&self) -> &CdpSession {
        &self.inner.browser
    }

    /// The event manager.
    pub fn event_manager(&self) -> &EventManager {
        &self.inner.event_manager
    }

    /// The browsing context storage.
    pub fn contexts(&self) -> &Arc<BrowsingContextStorage> {
        &self.inner.contexts
    }

    /// The target attached under a CDP session id.
    pub(crate) async fn target_for_session(&self, session_id: &str) -> Option<Arc<CdpTarget>> {
        self.inner.targets.lock().await.get(session_id).cloned()
    }

    /// All attached targets.
    pub(crate) async fn all_targets(&self) -> Vec<Arc<CdpTarget>> {
        self.inner.targets.lock().await.values().cloned().collect()
    }

    /// The event scope of a context, with storage lookups for the
    /// top-level ancestor and user context.
    pub(crate) async fn scope_for_context(&self, context_id: &str) -> EventScope {
        match self.inner.contexts.get(context_id).await {
            Ok(context) => context.event_scope(),
            Err(_) => EventScope {
                context: Some(context_id.to_string()),
                top_level_context: None,
                user_context: None,
            },
        }
    }

    /// Reconcile the Fetch domain on every attached target with the
    /// currently registered intercepts.
    pub(crate) async fn apply_fetch_state(&self) -> Result<()> {
        let (patterns, handle_auth) = {
            let network = self.inner.network.lock().await;
            network.fetch_wanted()
        };
        for target in self.all_targets().await {
            target
                .fetch_apply(patterns.clone(), handle_auth)
                .await
                .map_err(Error::from)?;
        }
        Ok(())
    }

    /// Whether any subscription wants network events for the scope.
    pub(crate) async fn network_module_wanted(&self, scope: &EventScope) -> bool {
        self.inner
            .subscriptions
            .lock()
            .await
            .is_module_subscribed("network", scope)
    }
}

#[cfg(test)]
mod tests;
