//! BluetoothEmulation domain types.
//!
//! Simulated Web Bluetooth adapters and peripherals. The BiDi bluetooth
//! module is a thin veneer over these commands, so parameters that the
//! mediator merely forwards stay as raw JSON values.

use serde::Serialize;
use serde_json::Value;

/// Parameters for BluetoothEmulation.enable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    /// State of the simulated central ("absent", "powered-off", "powered-on").
    pub state: String,
    /// Whether low-energy is supported.
    pub le_supported: bool,
}

/// Parameters for BluetoothEmulation.disable.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisableParams {}

/// Parameters for BluetoothEmulation.simulateAdvertisement.
#[derive(Debug, Clone, Serialize)]
pub struct SimulateAdvertisementParams {
    /// Advertisement packet entry, forwarded as-is.
    pub entry: Value,
}

/// Parameters for BluetoothEmulation.simulatePreconnectedPeripheral.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatePreconnectedPeripheralParams {
    /// Peripheral address.
    pub address: String,
    /// Peripheral name.
    pub name: String,
    /// Manufacturer data entries, forwarded as-is.
    pub manufacturer_data: Vec<Value>,
    /// Known service UUIDs.
    pub known_service_uuids: Vec<String>,
}
