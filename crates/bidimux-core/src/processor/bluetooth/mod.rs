//! bluetooth.* commands: thin passthroughs to the emulation domains.

use serde_json::{Value, json};

use bidimux_cdp::protocol::bluetooth_emulation as cdp_bluetooth;

use crate::error::{Error, Result};
use crate::protocol::bluetooth::{
    DisableSimulationParams, HandleRequestDevicePromptParams, SimulateAdapterParams,
    SimulateAdvertisementParams, SimulatePreconnectedPeripheralParams,
};
use crate::session::BidiSession;
use crate::target::CdpTarget;

async fn target_of(session: &BidiSession, context_id: &str) -> Result<std::sync::Arc<CdpTarget>> {
    let context = session.contexts().get_top_level(context_id).await?;
    Ok(context.target().await)
}

/// bluetooth.simulateAdapter
pub async fn simulate_adapter(
    session: &BidiSession,
    params: SimulateAdapterParams,
) -> Result<Value> {
    let target = target_of(session, &params.context).await?;
    target
        .session()
        .send_unit(
            "BluetoothEmulation.enable",
            Some(cdp_bluetooth::EnableParams {
                state: params.state,
                le_supported: params.le_supported.unwrap_or(true),
            }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// bluetooth.disableSimulation
pub async fn disable_simulation(
    session: &BidiSession,
    params: DisableSimulationParams,
) -> Result<Value> {
    let target = target_of(session, &params.context).await?;
    target
        .session()
        .send_unit(
            "BluetoothEmulation.disable",
            Some(cdp_bluetooth::DisableParams::default()),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// bluetooth.simulateAdvertisement
pub async fn simulate_advertisement(
    session: &BidiSession,
    params: SimulateAdvertisementParams,
) -> Result<Value> {
    let target = target_of(session, &params.context).await?;
    target
        .session()
        .send_unit(
            "BluetoothEmulation.simulateAdvertisement",
            Some(cdp_bluetooth::SimulateAdvertisementParams {
                entry: params.scan_entry,
            }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// bluetooth.simulatePreconnectedPeripheral
pub async fn simulate_preconnected_peripheral(
    session: &BidiSession,
    params: SimulatePreconnectedPeripheralParams,
) -> Result<Value> {
    let target = target_of(session, &params.context).await?;
    target
        .session()
        .send_unit(
            "BluetoothEmulation.simulatePreconnectedPeripheral",
            Some(cdp_bluetooth::SimulatePreconnectedPeripheralParams {
                address: params.address,
                name: params.name,
                manufacturer_data: params.manufacturer_data,
                known_service_uuids: params.known_service_uuids,
            }),
        )
        .await
        .map_err(Error::from)?;
    Ok(json!({}))
}

/// bluetooth.handleRequestDevicePrompt
pub async fn handle_request_device_prompt(
    session: &BidiSession,
    params: HandleRequestDevicePromptParams,
) -> Result<Value> {
    let target = target_of(session, &params.context).await?;
    if params.accept {
        let device = params.device.ok_or_else(|| {
            Error::invalid_argument("Accepting a device prompt requires a device")
        })?;
        target
            .session()
            .send_raw(
                "DeviceAccess.selectPrompt",
                Some(json!({"id": params.prompt, "deviceId": device})),
            )
            .await
            .map_err(Error::from)?;
    } else {
        target
            .session()
            .send_raw(
                "DeviceAccess.cancelPrompt",
                Some(json!({"id": params.prompt})),
            )
            .await
            .map_err(Error::from)?;
    }
    Ok(json!({}))
}
