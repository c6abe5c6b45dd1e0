//! # Bidimux CDP - Chrome DevTools Protocol client layer
//!
//! Browser-facing half of the bidimux mediator: a WebSocket CDP client with
//! command/response correlation, session multiplexing and typed protocol
//! domains.
//!
//! This crate handles:
//! - WebSocket connection management to Chrome/Chromium browsers
//! - CDP message serialization and deserialization
//! - Command/response handling with async/await
//! - Event fan-out to subscribers, per session or connection-wide
//! - Session-scoped client handles for attached targets
//!
//! ## Sending commands
//!
//! Commands are sent through a [`CdpSession`], which binds a connection to an
//! optional CDP session id:
//!
//! ```no_run
//! use bidimux_cdp::{CdpConnection, CdpSession};
//! use bidimux_cdp::protocol::target_domain::GetTargetsParams;
//!
//! # async fn example() -> Result<(), bidimux_cdp::CdpError> {
//! let conn = CdpConnection::connect("ws://localhost:9222/devtools/browser/...").await?;
//! let browser = CdpSession::browser(conn.into());
//!
//! let result: bidimux_cdp::protocol::target_domain::GetTargetsResult = browser
//!     .send("Target.getTargets", Some(GetTargetsParams::default()))
//!     .await?;
//! for target in result.target_infos {
//!     println!("Target: {} - {}", target.target_type, target.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Close errors
//!
//! Commands racing a closing target are routine during shutdown and tab
//! teardown. [`CdpError::is_target_closed`] recognises them so callers can
//! treat them as benign.
//!
//! ## Module organization
//!
//! - [`connection`] - WebSocket connection management
//! - [`session`] - session-scoped client handles
//! - [`transport`] - message types and serialization
//! - [`protocol`] - CDP domain type definitions
//! - [`error`] - error types

pub mod connection;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

pub use connection::CdpConnection;
pub use error::CdpError;
pub use session::CdpSession;
pub use transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
