//! Error types for the CDP client layer.

use thiserror::Error;

/// Errors produced by the CDP connection and session clients.
#[derive(Error, Debug)]
pub enum CdpError {
    /// WebSocket connection could not be established.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket connection dropped while a command was in flight.
    #[error("WebSocket connection lost")]
    ConnectionLost,

    /// Failed to hand a message to the write loop.
    #[error("failed to send CDP message: {0}")]
    SendFailed(String),

    /// The browser returned a protocol-level error.
    #[error("CDP protocol error {code}: {message}")]
    Protocol {
        /// JSON-RPC style error code.
        code: i64,
        /// Human readable message.
        message: String,
    },

    /// JSON serialization or deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::ConnectionFailed(err.to_string())
    }
}

/// Messages Chromium uses when a command races target or session teardown.
const CLOSE_MESSAGES: &[&str] = &[
    "Target closed",
    "Target is closed",
    "Session closed",
    "Session with given id not found",
    "Inspected target navigated or closed",
];

impl CdpError {
    /// Whether this error means the target or session went away.
    ///
    /// Commands racing a closing tab fail with one of a handful of
    /// protocol messages, or with a dead connection. Callers treat these
    /// as a normal shutdown race rather than a failure.
    pub fn is_target_closed(&self) -> bool {
        match self {
            Self::ConnectionLost => true,
            Self::Protocol { code, message } => {
                *code == -32001 || CLOSE_MESSAGES.iter().any(|m| message.contains(m))
            }
            _ => false,
        }
    }

    /// Whether this is a protocol error whose message contains `needle`.
    pub fn protocol_message_contains(&self, needle: &str) -> bool {
        matches!(self, Self::Protocol { message, .. } if message.contains(needle))
    }

    /// The protocol error code, if this is a protocol error.
    pub fn protocol_code(&self) -> Option<i64> {
        match self {
            Self::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
