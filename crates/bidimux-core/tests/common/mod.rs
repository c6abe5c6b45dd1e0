//! Shared harness: a scripted fake browser wired to a [`BidiSession`].

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use bidimux_core::BidiSession;
use bidimux_core::protocol::message::OutgoingMessage;

/// One recorded CDP command.
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub method: String,
    pub params: Value,
    pub session_id: Option<String>,
}

pub type Responder = dyn Fn(&str, &Value) -> Option<Value> + Send + Sync;

/// A BiDi session talking to a scripted browser.
pub struct Harness {
    pub session: BidiSession,
    sink: mpsc::UnboundedReceiver<OutgoingMessage>,
    event_tx: futures::channel::mpsc::UnboundedSender<
        Result<Message, tokio_tungstenite::tungstenite::Error>,
    >,
    commands: Arc<Mutex<Vec<RecordedCommand>>>,
}

impl Harness {
    /// Start a session whose browser answers commands with `responder`.
    pub fn start(responder: Arc<Responder>) -> Self {
        let (out_tx, mut out_rx) = futures::channel::mpsc::unbounded::<Message>();
        let (in_tx, in_rx) = futures::channel::mpsc::unbounded::<
            Result<Message, tokio_tungstenite::tungstenite::Error>,
        >();

        let sink = out_tx.sink_map_err(|_| tokio_tungstenite::tungstenite::Error::ConnectionClosed);
        let connection = Arc::new(bidimux_cdp::connection::CdpConnection::start(sink, in_rx));

        let commands: Arc<Mutex<Vec<RecordedCommand>>> = Arc::new(Mutex::new(Vec::new()));
        let recorded = commands.clone();
        let reply_tx = in_tx.clone();
        tokio::spawn(async move {
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

        let (sink_tx, sink) = mpsc::unbounded_channel();
        let session = BidiSession::new(connection, sink_tx);
        Self {
            session,
            sink,
            event_tx: in_tx,
            commands,
        }
    }

    /// Start with a browser that answers everything with `{}`.
    pub fn ok() -> Self {
        Self::start(Arc::new(|_, _| None))
    }

    /// Inject a CDP event.
    pub fn emit_cdp(&self, method: &str, params: Value, session_id: Option<&str>) {
        let mut frame = json!({"method": method, "params": params});
        if let Some(session) = session_id {
            frame["sessionId"] = json!(session);
        }
        let _ = self
            .event_tx
            .unbounded_send(Ok(Message::Text(frame.to_string().into())));
    }

    /// Every CDP command with the given method, in order.
    pub fn cdp_commands(&self, method: &str) -> Vec<RecordedCommand> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Wait for a CDP command to be sent.
    pub async fn wait_for_cdp(&self, method: &str) -> RecordedCommand {
        for _ in 0..500 {
            if let Some(found) = self.cdp_commands(method).into_iter().next() {
                return found;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        panic!("CDP command {method} was never sent");
    }

    /// Submit a command frame and wait for its response.
    pub async fn command(&mut self, id: u64, method: &str, params: Value) -> Value {
        self.session
            .process_command(&json!({"id": id, "method": method, "params": params}))
            .await;
        loop {
            let wire = self.next_message().await;
            if wire["id"] == json!(id) {
                return wire;
            }
        }
    }

    /// The next outgoing message of any kind.
    pub async fn next_message(&mut self) -> Value {
        self.sink
            .recv()
            .await
            .expect("an outgoing message")
            .to_wire()
    }

    /// The next outgoing event, skipping responses.
    pub async fn next_event(&mut self) -> Value {
        loop {
            let wire = self.next_message().await;
            if wire["type"] == "event" {
                return wire;
            }
        }
    }

    /// Assert no further message arrives within a short window.
    pub async fn expect_silence(&mut self) {
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        if let Ok(message) = self.sink.try_recv() {
            panic!("unexpected message: {}", message.to_wire());
        }
    }

    /// Attach a page target and wait for its context to register.
    pub async fn attach_page(&mut self, target_id: &str, session_id: &str) {
        self.emit_cdp(
            "Target.attachedToTarget",
            json!({
                "sessionId": session_id,
                "targetInfo": {
                    "targetId": target_id,
                    "type": "page",
                    "title": "",
                    "url": "about:blank",
                    "attached": true
                },
                "waitingForDebugger": true
            }),
            None,
        );
        for _ in 0..500 {
            if self.session.contexts().has_context(target_id).await {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        panic!("context never attached");
    }

    /// Register the default window realm of a context.
    pub fn create_default_realm(
        &self,
        context_id: &str,
        session_id: &str,
        execution_context_id: i64,
    ) {
        self.emit_cdp(
            "Runtime.executionContextCreated",
            json!({
                "context": {
                    "id": execution_context_id,
                    "origin": "https://example.com",
                    "name": "",
                    "auxData": {
                        "frameId": context_id,
                        "isDefault": true,
                        "type": "default"
                    }
                }
            }),
            Some(session_id),
        );
    }
}
