//! BiDi protocol types.
//!
//! Wire-level message framing plus the per-module command parameters,
//! results and event payloads. Parameter types deserialize from validated
//! command frames; result and event types serialize into outgoing
//! messages.

pub mod bluetooth;
pub mod browser;
pub mod browsing_context;
pub mod cdp;
pub mod command;
pub mod emulation;
pub mod input;
pub mod log;
pub mod message;
pub mod network;
pub mod permissions;
pub mod script;
pub mod session;
pub mod storage;
pub mod value;
pub mod web_extension;

pub use value::{ArgumentValue, LocalValue, RemoteReference, ResultOwnership, Target};

pub use command::Command;
pub use message::{CommandFrame, EventMessage, OutgoingMessage};

use serde::de::Deserializer;
use serde::Deserialize;

/// Distinguishes "field absent" from "field present but null".
///
/// Some BiDi parameters (e.g. `browsingContext.setViewport`'s `viewport`)
/// use `null` as an explicit "clear" while absence means "keep".
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
