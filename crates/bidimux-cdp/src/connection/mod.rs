//! CDP WebSocket connection management.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::CdpError;
use crate::transport::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};

/// Buffer size for the event broadcast channel.
const EVENT_CHANNEL_SIZE: usize = 1024;

/// Pending command responses, keyed by message id.
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<CdpResponse>>>>;

/// A CDP connection to a browser.
///
/// One connection carries the browser-level session plus every attached
/// target session; responses are correlated by message id, events are fanned
/// out to all subscribers. When the socket drops, every in-flight command
/// resolves with [`CdpError::ConnectionLost`].
#[derive(Debug)]
pub struct CdpConnection {
    /// Sender for outgoing messages.
    tx: mpsc::Sender<CdpRequest>,
    /// Broadcast side of the incoming event stream.
    event_tx: broadcast::Sender<CdpEvent>,
    /// Pending responses waiting for completion.
    pending: PendingMap,
    /// Atomic counter for message IDs.
    message_id: AtomicU64,
    /// Set once the read loop has ended.
    closed: Arc<AtomicBool>,
    /// Handle to the background read task.
    _read_handle: tokio::task::JoinHandle<()>,
    /// Handle to the background write task.
    _write_handle: tokio::task::JoinHandle<()>,
}

impl CdpConnection {
    /// Connect to a CDP WebSocket endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebSocket connection fails.
    #[instrument(level = "info", skip(ws_url), fields(ws_url = %ws_url))]
    pub async fn connect(ws_url: &str) -> Result<Self, CdpError> {
        info!("Connecting to CDP WebSocket endpoint");
        let (ws_stream, response) = tokio_tungstenite::connect_async(ws_url).await?;
        info!(status = %response.status(), "WebSocket connection established");

        let (write, read) = ws_stream.split();
        Ok(Self::start(write, read))
    }

    /// Build a connection from an already-split WebSocket stream pair.
    ///
    /// Exposed so tests can drive the connection over an in-process duplex
    /// stream instead of a live browser.
    pub fn start<W, R>(write: W, read: R) -> Self
    where
        W: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
            + Unpin
            + Send
            + 'static,
        R: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin
            + Send
            + 'static,
    {
        let (tx, rx) = mpsc::channel::<CdpRequest>(64);
        let (event_tx, _) = broadcast::channel::<CdpEvent>(EVENT_CHANNEL_SIZE);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let write_handle = tokio::spawn(Self::write_loop(rx, write));
        debug!("Spawned CDP write loop");

        let read_pending = pending.clone();
        let read_event_tx = event_tx.clone();
        let read_closed = closed.clone();
        let read_handle = tokio::spawn(Self::read_loop(
            read,
            read_pending,
            read_event_tx,
            read_closed,
        ));
        debug!("Spawned CDP read loop");

        Self {
            tx,
            event_tx,
            pending,
            message_id: AtomicU64::new(1),
            closed,
            _read_handle: read_handle,
            _write_handle: write_handle,
        }
    }

    /// Background task that writes CDP requests to the WebSocket.
    async fn write_loop<S>(mut rx: mpsc::Receiver<CdpRequest>, mut sink: S)
    where
        S: futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
    {
        debug!("CDP write loop started");
        while let Some(request) = rx.recv().await {
            let method = request.method.clone();
            let id = request.id;

            let json = match serde_json::to_string(&request) {
                Ok(j) => j,
                Err(e) => {
                    error!(error = %e, method = %method, "Failed to serialize CDP request");
                    continue;
                }
            };

            trace!(id = id, method = %method, json_len = json.len(), "Sending CDP request");

            if sink.send(Message::Text(json.into())).await.is_err() {
                warn!("WebSocket sink closed, ending write loop");
                break;
            }
        }
        debug!("CDP write loop ended");
    }

    /// Background task that reads CDP messages from the WebSocket.
    ///
    /// On exit, drains the pending map so every in-flight command observes
    /// the connection loss instead of hanging.
    async fn read_loop<S>(
        mut stream: S,
        pending: PendingMap,
        event_tx: broadcast::Sender<CdpEvent>,
        closed: Arc<AtomicBool>,
    ) where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        debug!("CDP read loop started");
        while let Some(msg) = stream.next().await {
            let msg = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(frame)) => {
                    info!(?frame, "WebSocket closed by remote");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "WebSocket error, ending read loop");
                    break;
                }
                Ok(_) => continue,
            };

            let cdp_msg: CdpMessage = match serde_json::from_str(&msg) {
                Ok(m) => m,
                Err(e) => {
                    error!(error = %e, "Failed to parse CDP message");
                    continue;
                }
            };

            match cdp_msg {
                CdpMessage::Response(resp) => {
                    let id = resp.id;
                    debug!(id = id, has_error = resp.error.is_some(), "Received CDP response");

                    let mut pending = pending.lock().await;
                    if let Some(sender) = pending.remove(&id) {
                        let _ = sender.send(resp);
                    } else {
                        warn!(id = id, "Received response for unknown request ID");
                    }
                }
                CdpMessage::Event(ref event) => {
                    trace!(method = %event.method, session_id = ?event.session_id, "Received CDP event");
                    // Broadcast to all subscribers; ignore if no receivers.
                    let _ = event_tx.send(event.clone());
                }
            }
        }

        closed.store(true, Ordering::SeqCst);
        // Fail whatever is still in flight. Dropping the sender resolves the
        // receiver side with a channel-closed error.
        pending.lock().await.clear();
        debug!("CDP read loop ended");
    }

    /// Send a CDP command and wait for the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be sent, the connection drops
    /// before a response arrives, or the browser returns a protocol error.
    #[instrument(level = "debug", skip(self, params), fields(method = %method, session_id = ?session_id))]
    pub async fn send_command<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        session_id: Option<&str>,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params_value = params.map(serde_json::to_value).transpose()?;
        let value = self.send_raw(method, params_value, session_id).await?;
        serde_json::from_value(value).map_err(CdpError::from)
    }

    /// Send a CDP command with untyped parameters, returning the raw result.
    ///
    /// This is the passthrough used by the `cdp.sendCommand` escape hatch,
    /// where the mediator does not know the command's shape.
    pub async fn send_raw(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CdpError::ConnectionLost);
        }

        let id = self.message_id.fetch_add(1, Ordering::Relaxed);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(ToString::to_string),
        };

        let (resp_tx, resp_rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id, resp_tx);
            trace!(id = id, pending_count = pending.len(), "Registered pending response");
        }

        self.tx
            .send(request)
            .await
            .map_err(|_| CdpError::ConnectionLost)?;

        let response = resp_rx.await.map_err(|_| CdpError::ConnectionLost)?;

        if let Some(ref error) = response.error {
            warn!(id = id, method = %method, code = error.code, error_msg = %error.message, "CDP protocol error");
            return Err(CdpError::Protocol {
                code: error.code,
                message: error.message.clone(),
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Subscribe to CDP events.
    ///
    /// Returns a receiver that observes every event from the browser, across
    /// all sessions. Consumers filter by `session_id`.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CdpEvent> {
        self.event_tx.subscribe()
    }

    /// Whether the underlying socket has closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests;
