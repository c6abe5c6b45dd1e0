//! bluetooth module parameters.
//!
//! Thin passthroughs to the BluetoothEmulation CDP domain; payloads the
//! mediator merely forwards stay untyped.

use serde::Deserialize;
use serde_json::Value;

/// Parameters for bluetooth.simulateAdapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateAdapterParams {
    /// Context the simulation applies to.
    pub context: String,
    /// Adapter state: "absent", "powered-off" or "powered-on".
    pub state: String,
    /// Whether low-energy is supported; defaults to true.
    #[serde(default)]
    pub le_supported: Option<bool>,
}

/// Parameters for bluetooth.disableSimulation.
#[derive(Debug, Clone, Deserialize)]
pub struct DisableSimulationParams {
    /// Context the simulation applies to.
    pub context: String,
}

/// Parameters for bluetooth.simulateAdvertisement.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateAdvertisementParams {
    /// Context the simulation applies to.
    pub context: String,
    /// Scan entry, forwarded as-is.
    pub scan_entry: Value,
}

/// Parameters for bluetooth.simulatePreconnectedPeripheral.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatePreconnectedPeripheralParams {
    /// Context the simulation applies to.
    pub context: String,
    /// Peripheral address.
    pub address: String,
    /// Peripheral name.
    pub name: String,
    /// Manufacturer data entries, forwarded as-is.
    pub manufacturer_data: Vec<Value>,
    /// Known service UUIDs.
    pub known_service_uuids: Vec<String>,
}

/// Parameters for bluetooth.handleRequestDevicePrompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleRequestDevicePromptParams {
    /// Context showing the prompt.
    pub context: String,
    /// The prompt id.
    pub prompt: String,
    /// Whether to accept the prompt.
    pub accept: bool,
    /// Device to select when accepting.
    #[serde(default)]
    pub device: Option<String>,
}
