//! Command dispatch by method name.
//!
//! Every BiDi method is one variant of [`Command`]; parsing a frame picks
//! the variant by exhaustive match on the method string and validates the
//! params with the module's parameter type. A method match with bad params
//! is `invalid argument`; an unmatched method is `unknown command`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorCode};

use super::{
    bluetooth, browser, browsing_context, cdp, emulation, input, network, permissions, script,
    session, storage, web_extension,
};

/// A parsed and validated BiDi command.
#[derive(Debug, Clone)]
pub enum Command {
    // session.*
    /// session.status
    SessionStatus(session::EmptyParams),
    /// session.new
    SessionNew(session::NewParams),
    /// session.end
    SessionEnd(session::EmptyParams),
    /// session.subscribe
    SessionSubscribe(session::SubscriptionRequest),
    /// session.unsubscribe
    SessionUnsubscribe(session::UnsubscribeRequest),
    /// session.unsubscribeById
    SessionUnsubscribeById(session::UnsubscribeByIdRequest),

    // browser.*
    /// browser.close
    BrowserClose(session::EmptyParams),
    /// browser.createUserContext
    BrowserCreateUserContext(browser::CreateUserContextParams),
    /// browser.removeUserContext
    BrowserRemoveUserContext(browser::RemoveUserContextParams),
    /// browser.getUserContexts
    BrowserGetUserContexts(session::EmptyParams),
    /// browser.getClientWindows
    BrowserGetClientWindows(session::EmptyParams),
    /// browser.setClientWindowState
    BrowserSetClientWindowState(browser::SetClientWindowStateParams),

    // browsingContext.*
    /// browsingContext.getTree
    ContextGetTree(browsing_context::GetTreeParams),
    /// browsingContext.create
    ContextCreate(browsing_context::CreateParams),
    /// browsingContext.close
    ContextClose(browsing_context::CloseParams),
    /// browsingContext.navigate
    ContextNavigate(browsing_context::NavigateParams),
    /// browsingContext.reload
    ContextReload(browsing_context::ReloadParams),
    /// browsingContext.activate
    ContextActivate(browsing_context::ActivateParams),
    /// browsingContext.handleUserPrompt
    ContextHandleUserPrompt(browsing_context::HandleUserPromptParams),
    /// browsingContext.captureScreenshot
    ContextCaptureScreenshot(browsing_context::CaptureScreenshotParams),
    /// browsingContext.print
    ContextPrint(browsing_context::PrintParams),
    /// browsingContext.setViewport
    ContextSetViewport(browsing_context::SetViewportParams),
    /// browsingContext.traverseHistory
    ContextTraverseHistory(browsing_context::TraverseHistoryParams),
    /// browsingContext.locateNodes
    ContextLocateNodes(browsing_context::LocateNodesParams),

    // script.*
    /// script.getRealms
    ScriptGetRealms(script::GetRealmsParams),
    /// script.evaluate
    ScriptEvaluate(script::EvaluateParams),
    /// script.callFunction
    ScriptCallFunction(script::CallFunctionParams),
    /// script.disown
    ScriptDisown(script::DisownParams),
    /// script.addPreloadScript
    ScriptAddPreloadScript(script::AddPreloadScriptParams),
    /// script.removePreloadScript
    ScriptRemovePreloadScript(script::RemovePreloadScriptParams),

    // network.*
    /// network.addIntercept
    NetworkAddIntercept(network::AddInterceptParams),
    /// network.removeIntercept
    NetworkRemoveIntercept(network::RemoveInterceptParams),
    /// network.continueRequest
    NetworkContinueRequest(network::ContinueRequestParams),
    /// network.continueResponse
    NetworkContinueResponse(network::ContinueResponseParams),
    /// network.continueWithAuth
    NetworkContinueWithAuth(network::ContinueWithAuthParams),
    /// network.failRequest
    NetworkFailRequest(network::FailRequestParams),
    /// network.provideResponse
    NetworkProvideResponse(network::ProvideResponseParams),
    /// network.setCacheBehavior
    NetworkSetCacheBehavior(network::SetCacheBehaviorParams),
    /// network.addDataCollector
    NetworkAddDataCollector(network::AddDataCollectorParams),
    /// network.removeDataCollector
    NetworkRemoveDataCollector(network::RemoveDataCollectorParams),
    /// network.getData
    NetworkGetData(network::GetDataParams),
    /// network.disownData
    NetworkDisownData(network::DisownDataParams),

    // storage.*
    /// storage.getCookies
    StorageGetCookies(storage::GetCookiesParams),
    /// storage.setCookie
    StorageSetCookie(storage::SetCookieParams),
    /// storage.deleteCookies
    StorageDeleteCookies(storage::DeleteCookiesParams),

    // input.*
    /// input.performActions
    InputPerformActions(input::PerformActionsParams),
    /// input.releaseActions
    InputReleaseActions(input::ReleaseActionsParams),
    /// input.setFiles
    InputSetFiles(input::SetFilesParams),

    // permissions.*
    /// permissions.setPermission
    PermissionsSetPermission(permissions::SetPermissionParams),

    // emulation.*
    /// emulation.setGeolocationOverride
    EmulationSetGeolocationOverride(emulation::SetGeolocationOverrideParams),
    /// emulation.setLocaleOverride
    EmulationSetLocaleOverride(emulation::SetLocaleOverrideParams),
    /// emulation.setScreenOrientationOverride
    EmulationSetScreenOrientationOverride(emulation::SetScreenOrientationOverrideParams),
    /// emulation.setTimezoneOverride
    EmulationSetTimezoneOverride(emulation::SetTimezoneOverrideParams),

    // webExtension.*
    /// webExtension.install
    WebExtensionInstall(web_extension::InstallParams),
    /// webExtension.uninstall
    WebExtensionUninstall(web_extension::UninstallParams),

    // bluetooth.*
    /// bluetooth.simulateAdapter
    BluetoothSimulateAdapter(bluetooth::SimulateAdapterParams),
    /// bluetooth.disableSimulation
    BluetoothDisableSimulation(bluetooth::DisableSimulationParams),
    /// bluetooth.simulateAdvertisement
    BluetoothSimulateAdvertisement(bluetooth::SimulateAdvertisementParams),
    /// bluetooth.simulatePreconnectedPeripheral
    BluetoothSimulatePreconnectedPeripheral(bluetooth::SimulatePreconnectedPeripheralParams),
    /// bluetooth.handleRequestDevicePrompt
    BluetoothHandleRequestDevicePrompt(bluetooth::HandleRequestDevicePromptParams),

    // cdp.*
    /// cdp.sendCommand (vendor extension, "goog:cdp.sendCommand")
    CdpSendCommand(cdp::SendCommandParams),
    /// cdp.getSession (vendor extension)
    CdpGetSession(cdp::GetSessionParams),
    /// cdp.resolveRealm (vendor extension)
    CdpResolveRealm(cdp::ResolveRealmParams),
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, Error> {
    serde_json::from_value(params.clone())
        .map_err(|e| Error::invalid_argument(format!("Invalid params: {e}")))
}

impl Command {
    /// Resolve a method name and raw params into a command.
    ///
    /// # Errors
    ///
    /// `unknown command` for an unrecognised method; `invalid argument`
    /// when the params do not validate against the method's schema.
    pub fn parse(method: &str, params: &Value) -> Result<Self, Error> {
        let command = match method {
            "session.status" => Self::SessionStatus(parse_params(params)?),
            "session.new" => Self::SessionNew(parse_params(params)?),
            "session.end" => Self::SessionEnd(parse_params(params)?),
            "session.subscribe" => Self::SessionSubscribe(parse_params(params)?),
            "session.unsubscribe" => Self::SessionUnsubscribe(parse_params(params)?),
            "session.unsubscribeById" => Self::SessionUnsubscribeById(parse_params(params)?),

            "browser.close" => Self::BrowserClose(parse_params(params)?),
            "browser.createUserContext" => Self::BrowserCreateUserContext(parse_params(params)?),
            "browser.removeUserContext" => Self::BrowserRemoveUserContext(parse_params(params)?),
            "browser.getUserContexts" => Self::BrowserGetUserContexts(parse_params(params)?),
            "browser.getClientWindows" => Self::BrowserGetClientWindows(parse_params(params)?),
            "browser.setClientWindowState" => {
                Self::BrowserSetClientWindowState(parse_params(params)?)
            }

            "browsingContext.getTree" => Self::ContextGetTree(parse_params(params)?),
            "browsingContext.create" => Self::ContextCreate(parse_params(params)?),
            "browsingContext.close" => Self::ContextClose(parse_params(params)?),
            "browsingContext.navigate" => Self::ContextNavigate(parse_params(params)?),
            "browsingContext.reload" => Self::ContextReload(parse_params(params)?),
            "browsingContext.activate" => Self::ContextActivate(parse_params(params)?),
            "browsingContext.handleUserPrompt" => {
                Self::ContextHandleUserPrompt(parse_params(params)?)
            }
            "browsingContext.captureScreenshot" => {
                Self::ContextCaptureScreenshot(parse_params(params)?)
            }
            "browsingContext.print" => Self::ContextPrint(parse_params(params)?),
            "browsingContext.setViewport" => Self::ContextSetViewport(parse_params(params)?),
            "browsingContext.traverseHistory" => {
                Self::ContextTraverseHistory(parse_params(params)?)
            }
            "browsingContext.locateNodes" => Self::ContextLocateNodes(parse_params(params)?),

            "script.getRealms" => Self::ScriptGetRealms(parse_params(params)?),
            "script.evaluate" => Self::ScriptEvaluate(parse_params(params)?),
            "script.callFunction" => Self::ScriptCallFunction(parse_params(params)?),
            "script.disown" => Self::ScriptDisown(parse_params(params)?),
            "script.addPreloadScript" => Self::ScriptAddPreloadScript(parse_params(params)?),
            "script.removePreloadScript" => {
                Self::ScriptRemovePreloadScript(parse_params(params)?)
            }

            "network.addIntercept" => Self::NetworkAddIntercept(parse_params(params)?),
            "network.removeIntercept" => Self::NetworkRemoveIntercept(parse_params(params)?),
            "network.continueRequest" => Self::NetworkContinueRequest(parse_params(params)?),
            "network.continueResponse" => Self::NetworkContinueResponse(parse_params(params)?),
            "network.continueWithAuth" => Self::NetworkContinueWithAuth(parse_params(params)?),
            "network.failRequest" => Self::NetworkFailRequest(parse_params(params)?),
            "network.provideResponse" => Self::NetworkProvideResponse(parse_params(params)?),
            "network.setCacheBehavior" => Self::NetworkSetCacheBehavior(parse_params(params)?),
            "network.addDataCollector" => Self::NetworkAddDataCollector(parse_params(params)?),
            "network.removeDataCollector" => {
                Self::NetworkRemoveDataCollector(parse_params(params)?)
            }
            "network.getData" => Self::NetworkGetData(parse_params(params)?),
            "network.disownData" => Self::NetworkDisownData(parse_params(params)?),

            "storage.getCookies" => Self::StorageGetCookies(parse_params(params)?),
            "storage.setCookie" => Self::StorageSetCookie(parse_params(params)?),
            "storage.deleteCookies" => Self::StorageDeleteCookies(parse_params(params)?),

            "input.performActions" => Self::InputPerformActions(parse_params(params)?),
            "input.releaseActions" => Self::InputReleaseActions(parse_params(params)?),
            "input.setFiles" => Self::InputSetFiles(parse_params(params)?),

            "permissions.setPermission" => Self::PermissionsSetPermission(parse_params(params)?),

            "emulation.setGeolocationOverride" => {
                Self::EmulationSetGeolocationOverride(parse_params(params)?)
            }
            "emulation.setLocaleOverride" => {
                Self::EmulationSetLocaleOverride(parse_params(params)?)
            }
            "emulation.setScreenOrientationOverride" => {
                Self::EmulationSetScreenOrientationOverride(parse_params(params)?)
            }
            "emulation.setTimezoneOverride" => {
                Self::EmulationSetTimezoneOverride(parse_params(params)?)
            }

            "webExtension.install" => Self::WebExtensionInstall(parse_params(params)?),
            "webExtension.uninstall" => Self::WebExtensionUninstall(parse_params(params)?),

            "bluetooth.simulateAdapter" => Self::BluetoothSimulateAdapter(parse_params(params)?),
            "bluetooth.disableSimulation" => {
                Self::BluetoothDisableSimulation(parse_params(params)?)
            }
            "bluetooth.simulateAdvertisement" => {
                Self::BluetoothSimulateAdvertisement(parse_params(params)?)
            }
            "bluetooth.simulatePreconnectedPeripheral" => {
                Self::BluetoothSimulatePreconnectedPeripheral(parse_params(params)?)
            }
            "bluetooth.handleRequestDevicePrompt" => {
                Self::BluetoothHandleRequestDevicePrompt(parse_params(params)?)
            }

            "cdp.sendCommand" | "goog:cdp.sendCommand" => {
                Self::CdpSendCommand(parse_params(params)?)
            }
            "cdp.getSession" | "goog:cdp.getSession" => Self::CdpGetSession(parse_params(params)?),
            "cdp.resolveRealm" | "goog:cdp.resolveRealm" => {
                Self::CdpResolveRealm(parse_params(params)?)
            }

            _ => {
                return Err(Error::new(
                    ErrorCode::UnknownCommand,
                    format!("Unknown command '{method}'"),
                ));
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests;
