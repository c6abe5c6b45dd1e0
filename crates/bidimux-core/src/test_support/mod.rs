//! In-process fake browser for unit and integration tests.
//!
//! Wires a [`CdpConnection`] to memory channels and answers every CDP
//! command with a scripted responder, recording the calls so tests can
//! assert on the traffic. Events are injected as raw CDP frames.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use bidimux_cdp::connection::CdpConnection;

/// One recorded CDP command.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    /// CDP method.
    pub method: String,
    /// Raw params.
    pub params: Value,
    /// Session the command was sent on.
    pub session_id: Option<String>,
}

/// Scripted responder: returns the `result` payload for a command, or
/// `None` for an empty object.
pub type Responder = dyn Fn(&str, &Value) -> Option<Value> + Send + Sync;

/// A fake browser end of a CDP connection.
pub struct FakeBrowser {
    /// The mediator-side connection.
    pub connection: Arc<CdpConnection>,
    /// Sender used to inject CDP events into the connection.
    event_tx: futures::channel::mpsc::UnboundedSender<
        Result<Message, tokio_tungstenite::tungstenite::Error>,
    >,
    /// Every command the mediator sent, in order.
    commands: Arc<Mutex<Vec<RecordedCommand>>>,
    /// The responder task.
    responder_handle: tokio::task::JoinHandle<()>,
}

impl FakeBrowser {
    /// Start a fake browser that answers commands with `responder`.
    pub fn start(responder: Arc<Responder>) -> Self {
        let (out_tx, mut out_rx) = futures::channel::mpsc::unbounded::<Message>();
        let (in_tx, in_rx) = futures::channel::mpsc::unbounded::<
            Result<Message, tokio_tungstenite::tungstenite::Error>,
        >();

        let sink = out_tx.sink_map_err(|_| tokio_tungstenite::tungstenite::Error::ConnectionClosed);
        let connection = Arc::new(CdpConnection::start(sink, in_rx));

        let commands = Arc::new(Mutex::new(Vec::new()));
        let recorded = commands.clone();
        let reply_tx = in_tx.clone();
        let responder_handle = tokio::spawn(async move {
            while let Some(frame) = out_rx.next().await {
                let Message::Text(text) = frame else { continue };
                let Ok(request) = serde_json::from_str::<Value>(&text) else {
                    continue;
                };
                let id = request["id"].as_u64().unwrap_or(0);
                let method = request["method"].as_str().unwrap_or("").to_string();
                let params = request.get("params").cloned().unwrap_or(json!({}));
                let session_id = request
                    .get("sessionId")
                    .and_then(Value::as_str)
                    .map(str::to_string);

                recorded.lock().unwrap().push(RecordedCommand {
                    method: method.clone(),
                    params: params.clone(),
                    session_id: session_id.clone(),
                });

                let result = responder(&method, &params).unwrap_or_else(|| json!({}));
                let mut response = json!({"id": id, "result": result});
                if let Some(session) = session_id {
                    response["sessionId"] = json!(session);
                }
                let _ = reply_tx.unbounded_send(Ok(Message::Text(response.to_string().into())));
            }
        });

        Self {
            connection,
            event_tx: in_tx,
            commands,
            responder_handle,
        }
    }

    /// Tear the browser side down: in-flight and future commands fail with
    /// a connection-lost error.
    pub fn close(self) {
        self.responder_handle.abort();
        drop(self.event_tx);
    }

    /// Start a fake browser that answers everything with `{}`.
    pub fn ok() -> Self {
        Self::start(Arc::new(|_, _| None))
    }

    /// Inject a CDP event frame.
    pub fn emit_event(&self, method: &str, params: Value, session_id: Option<&str>) {
        let mut frame = json!({"method": method, "params": params});
        if let Some(session) = session_id {
            frame["sessionId"] = json!(session);
        }
        let _ = self
            .event_tx
            .unbounded_send(Ok(Message::Text(frame.to_string().into())));
    }

    /// Snapshot of the commands sent so far.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// The methods sent so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }

    /// Wait until a command with `method` was recorded, with a bounded
    /// number of scheduler yields.
    pub async fn wait_for_command(&self, method: &str) -> Option<RecordedCommand> {
        for _ in 0..200 {
            if let Some(found) = self
                .commands
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.method == method)
                .cloned()
            {
                return Some(found);
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        None
    }
}
