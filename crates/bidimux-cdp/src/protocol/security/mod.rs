//! Security domain types.

use serde::Serialize;

/// Parameters for Security.setIgnoreCertificateErrors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIgnoreCertificateErrorsParams {
    /// If true, all certificate errors will be ignored.
    pub ignore: bool,
}
