//! webExtension module parameters and results.

use serde::{Deserialize, Serialize};

/// How the extension payload is delivered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExtensionData {
    /// An unpacked extension directory on disk.
    Path {
        /// Absolute directory path.
        path: String,
    },
    /// A packed extension archive on disk.
    ArchivePath {
        /// Absolute archive path.
        path: String,
    },
    /// A packed extension as base64.
    Base64 {
        /// Encoded archive bytes.
        value: String,
    },
}

/// Parameters for webExtension.install.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallParams {
    /// The extension payload.
    pub extension_data: ExtensionData,
}

/// Result of webExtension.install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    /// Id of the installed extension.
    pub extension: String,
}

/// Parameters for webExtension.uninstall.
#[derive(Debug, Clone, Deserialize)]
pub struct UninstallParams {
    /// Id of the extension to remove.
    pub extension: String,
}
