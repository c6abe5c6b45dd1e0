//! Extensions domain types.
//!
//! Loading and unloading unpacked extensions; requires the browser to run
//! with extension debugging enabled.

use serde::{Deserialize, Serialize};

/// Parameters for Extensions.loadUnpacked.
#[derive(Debug, Clone, Serialize)]
pub struct LoadUnpackedParams {
    /// Absolute file path of the extension directory.
    pub path: String,
}

/// Result of Extensions.loadUnpacked.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadUnpackedResult {
    /// Extension id.
    pub id: String,
}

/// Parameters for Extensions.uninstall.
#[derive(Debug, Clone, Serialize)]
pub struct UninstallParams {
    /// Extension id.
    pub id: String,
}
