//! BiDi wire message framing.
//!
//! Command frames come in as JSON objects with `id`, `method` and `params`;
//! success, error and event messages go out. An optional `goog:channel`
//! member tags a side-channel on a command and is echoed on everything the
//! command or its subscriptions produce.

use serde_json::{Value, json};

use crate::error::{Error, ErrorCode};

/// Name of the side-channel member on command frames and outgoing messages.
pub const CHANNEL_FIELD: &str = "goog:channel";

/// A parsed BiDi command frame.
#[derive(Debug, Clone)]
pub struct CommandFrame {
    /// Client-chosen command id, echoed on the response.
    pub id: u64,
    /// Method name of the form `module.verb`.
    pub method: String,
    /// Raw parameters, validated later by the module parser.
    pub params: Value,
    /// Side-channel tag; an empty string is treated as absent.
    pub channel: Option<String>,
}

/// Why a frame could not be parsed.
///
/// Carries whatever command id could still be extracted, so the error
/// response can reference it.
#[derive(Debug, Clone)]
pub struct FrameError {
    /// The command id, if one was parseable.
    pub id: Option<u64>,
    /// The error to report.
    pub error: Error,
}

impl CommandFrame {
    /// Parse a raw JSON value into a command frame.
    ///
    /// # Errors
    ///
    /// Returns `invalid argument` when the frame is not an object, the id
    /// is missing or not a non-negative integer, the method is missing or
    /// empty, or the params are missing or not an object.
    pub fn parse(raw: &Value) -> Result<Self, FrameError> {
        let Some(object) = raw.as_object() else {
            return Err(FrameError {
                id: None,
                error: Error::invalid_argument("Expected a JSON object as a command"),
            });
        };

        // The id is extracted first so that later failures can echo it.
        let id = object.get("id").and_then(Value::as_u64);

        let fail = |message: &str| FrameError {
            id,
            error: Error::invalid_argument(message),
        };

        if !object.contains_key("id") {
            return Err(fail("Command must have an id"));
        }
        let Some(id) = id else {
            return Err(fail("Command id must be a non-negative integer"));
        };

        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| fail("Command must have a string method"))?;
        if method.is_empty() || !method.contains('.') {
            return Err(fail("Command method must be of the form module.verb"));
        }

        let params = object
            .get("params")
            .ok_or_else(|| fail("Command must have params"))?;
        if !params.is_object() {
            return Err(fail("Command params must be an object"));
        }

        let channel = match object.get(CHANNEL_FIELD) {
            None => None,
            Some(Value::String(tag)) if tag.is_empty() => None,
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(_) => return Err(fail("Channel must be a string")),
        };

        Ok(Self {
            id,
            method: method.to_string(),
            params: params.clone(),
            channel,
        })
    }
}

/// A BiDi event body, before channel resolution.
#[derive(Debug, Clone)]
pub struct EventMessage {
    /// Event method of the form `module.eventName`.
    pub method: String,
    /// Event payload.
    pub params: Value,
}

impl EventMessage {
    /// Build an event message.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// One message bound for the client: a BiDi body plus the side-channel tag
/// it should be emitted under.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// The complete BiDi message body, without the channel member.
    pub body: Value,
    /// Side-channel tag to stamp onto the serialized message.
    pub channel: Option<String>,
}

impl OutgoingMessage {
    /// A success response for the given command id.
    pub fn success(id: u64, result: Value, channel: Option<String>) -> Self {
        Self {
            body: json!({
                "type": "success",
                "id": id,
                "result": result,
            }),
            channel,
        }
    }

    /// An error response; the id is omitted when it was unparseable.
    pub fn error(id: Option<u64>, error: &Error, channel: Option<String>) -> Self {
        let mut body = json!({
            "type": "error",
            "error": error.code.as_str(),
            "message": error.message,
        });
        if let Some(id) = id {
            body["id"] = json!(id);
        }
        if let Some(ref stacktrace) = error.stacktrace {
            body["stacktrace"] = json!(stacktrace);
        }
        Self {
            body,
            channel,
        }
    }

    /// An event message.
    pub fn event(event: &EventMessage, channel: Option<String>) -> Self {
        Self {
            body: json!({
                "type": "event",
                "method": event.method,
                "params": event.params,
            }),
            channel,
        }
    }

    /// Serialize to the exact JSON that goes on the wire, with the channel
    /// member injected when present.
    pub fn to_wire(&self) -> Value {
        let mut body = self.body.clone();
        if let (Some(channel), Some(object)) = (&self.channel, body.as_object_mut()) {
            object.insert(CHANNEL_FIELD.to_string(), json!(channel));
        }
        body
    }

    /// The error code carried by this message, if it is an error response.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Map a caught handler failure to an error message for the wire.
pub fn error_from_code(code: ErrorCode, message: impl Into<String>) -> Error {
    Error::new(code, message)
}

/// Current wall-clock time in milliseconds since the UNIX epoch, as
/// stamped onto BiDi events.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests;
