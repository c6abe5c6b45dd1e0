//! webExtension.* commands.

use serde_json::{Value, json};

use bidimux_cdp::protocol::extensions::{LoadUnpackedParams, LoadUnpackedResult, UninstallParams};

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::web_extension::{
    ExtensionData, InstallParams, InstallResult, UninstallParams as BidiUninstallParams,
};
use crate::session::BidiSession;

/// webExtension.install
pub async fn install(session: &BidiSession, params: InstallParams) -> Result<Value> {
    let path = match params.extension_data {
        ExtensionData::Path { path } => path,
        // Chromium only loads unpacked extensions over CDP.
        ExtensionData::ArchivePath { .. } | ExtensionData::Base64 { .. } => {
            return Err(Error::new(
                ErrorCode::UnsupportedOperation,
                "Only unpacked extension paths are supported",
            ));
        }
    };

    let result: LoadUnpackedResult = session
        .browser()
        .send("Extensions.loadUnpacked", Some(LoadUnpackedParams { path }))
        .await
        .map_err(|err| Error::invalid_argument(err.to_string()))?;

    Ok(json!(InstallResult {
        extension: result.id,
    }))
}

/// webExtension.uninstall
pub async fn uninstall(session: &BidiSession, params: BidiUninstallParams) -> Result<Value> {
    session
        .browser()
        .send_unit(
            "Extensions.uninstall",
            Some(UninstallParams {
                id: params.extension,
            }),
        )
        .await
        .map_err(|err| Error::invalid_argument(err.to_string()))?;
    Ok(json!({}))
}
