//! Session-scoped CDP client handles.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::trace;

use crate::connection::CdpConnection;
use crate::error::CdpError;
use crate::transport::CdpEvent;

/// A client bound to one CDP session on a shared connection.
///
/// Cloning is cheap; clones address the same session. The browser-level
/// client is a session with no id.
#[derive(Debug, Clone)]
pub struct CdpSession {
    connection: Arc<CdpConnection>,
    session_id: Option<String>,
}

impl CdpSession {
    /// The browser-level client: commands carry no session id.
    pub fn browser(connection: Arc<CdpConnection>) -> Self {
        Self {
            connection,
            session_id: None,
        }
    }

    /// A client for an attached target session.
    pub fn attached(connection: Arc<CdpConnection>, session_id: impl Into<String>) -> Self {
        Self {
            connection,
            session_id: Some(session_id.into()),
        }
    }

    /// The session id this client addresses, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// The shared connection.
    pub fn connection(&self) -> &Arc<CdpConnection> {
        &self.connection
    }

    /// Send a typed CDP command on this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails at the transport or protocol
    /// level, or the result does not deserialize into `R`.
    pub async fn send<P, R>(&self, method: &str, params: Option<P>) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.connection
            .send_command(method, params, self.session_id.as_deref())
            .await
    }

    /// Send a command whose result is discarded.
    pub async fn send_unit<P: Serialize>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<(), CdpError> {
        let _: Value = self.send(method, params).await?;
        Ok(())
    }

    /// Send a command with raw JSON parameters, returning the raw result.
    pub async fn send_raw(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .send_raw(method, params, self.session_id.as_deref())
            .await
    }

    /// Subscribe to the connection-wide event stream.
    ///
    /// The stream carries every session's events; use [`Self::owns_event`]
    /// to filter for this session.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CdpEvent> {
        self.connection.subscribe_events()
    }

    /// Whether an event belongs to this session.
    ///
    /// Browser-level clients own only sessionless events.
    pub fn owns_event(&self, event: &CdpEvent) -> bool {
        let owns = event.session_id.as_deref() == self.session_id.as_deref();
        if owns {
            trace!(method = %event.method, session_id = ?self.session_id, "Event accepted for session");
        }
        owns
    }
}
