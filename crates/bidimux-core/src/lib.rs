//! # Bidimux Core - BiDi/CDP mediation engine
//!
//! The command/event mediation engine between the W3C WebDriver BiDi
//! protocol (client side) and the Chrome DevTools Protocol (browser side).
//!
//! A BiDi client submits commands such as "navigate this browsing context",
//! "evaluate this script in that realm" or "intercept matching network
//! requests"; the engine realises each by orchestrating CDP operations
//! across one or more CDP sessions, correlates asynchronous CDP events into
//! BiDi events and multiplexes everything back over one ordered outgoing
//! stream.
//!
//! ## Architecture
//!
//! - [`session::BidiSession`] owns the CDP connection, the storages and the
//!   outgoing queue; it is the aggregate the transport front-end talks to.
//! - [`protocol::command`] parses incoming frames; the session dispatches
//!   them to the module processors by exhaustive match on the method.
//! - [`event`] resolves which subscriptions receive each BiDi event and
//!   keeps per-connection ordering through the processing queue.
//! - [`target`] tracks attached CDP targets: per-target domain enablement,
//!   the unblocked latch and Fetch reconciliation.
//! - [`context`] is the browsing-context tree with the navigation state
//!   machine.
//! - [`realm`] is the script execution bridge: realms, handle ownership,
//!   value (de)serialisation and the channel back-channel.
//! - [`network`] joins CDP network events into BiDi network events and
//!   drives the fetch interception phases.
//!
//! The transport front-end (WebSocket server) and the browser launcher are
//! out of scope; the engine consumes an established [`bidimux_cdp`]
//! connection and an outgoing message sink.

pub mod context;
#[cfg(test)]
pub(crate) mod test_support;
pub mod error;
pub mod event;
pub mod network;
pub mod processor;
pub mod protocol;
pub mod queue;
pub mod realm;
pub mod script;
pub mod session;
pub mod target;
pub mod wait;

pub use error::{Error, ErrorCode};
pub use session::BidiSession;
