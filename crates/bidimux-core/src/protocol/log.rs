//! log module event payloads.

use serde::Serialize;
use serde_json::Value;

use super::script::Source;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose diagnostics.
    Debug,
    /// Informational output.
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

/// Payload of log.entryAdded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Entry kind: "console" or "javascript".
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Severity.
    pub level: LogLevel,
    /// Realm and context the entry originated from.
    pub source: Source,
    /// Rendered message text, if any.
    pub text: Option<String>,
    /// Timestamp, milliseconds since the epoch.
    pub timestamp: u64,
    /// Serialized console arguments, for console entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
    /// Console method, for console entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Stack trace, when one was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<Value>,
}
