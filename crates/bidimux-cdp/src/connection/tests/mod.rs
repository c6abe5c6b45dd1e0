use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use super::*;
use crate::error::CdpError;

type WireTx = futures::channel::mpsc::UnboundedSender<
    Result<Message, tokio_tungstenite::tungstenite::Error>,
>;

/// A connection wired to in-memory channels instead of a socket.
///
/// Returns the connection, the stream of frames it writes, and a sender
/// for frames it should read.
fn fake_connection() -> (
    CdpConnection,
    futures::channel::mpsc::UnboundedReceiver<Message>,
    WireTx,
) {
    let (out_tx, out_rx) = futures::channel::mpsc::unbounded::<Message>();
    let (in_tx, in_rx) =
        futures::channel::mpsc::unbounded::<Result<Message, tokio_tungstenite::tungstenite::Error>>();

    let sink =
        out_tx.sink_map_err(|_| tokio_tungstenite::tungstenite::Error::ConnectionClosed);
    let conn = CdpConnection::start(sink, in_rx);
    (conn, out_rx, in_tx)
}

async fn next_written_frame(
    out_rx: &mut futures::channel::mpsc::UnboundedReceiver<Message>,
) -> serde_json::Value {
    let frame = StreamExt::next(out_rx).await.expect("a frame was written");
    let Message::Text(text) = frame else {
        panic!("expected a text frame");
    };
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn command_round_trip() {
    let (conn, mut out_rx, in_tx) = fake_connection();

    let send = tokio::spawn(async move {
        conn.send_raw("Browser.getVersion", None, None).await
    });

    let written = next_written_frame(&mut out_rx).await;
    assert_eq!(written["method"], "Browser.getVersion");
    let id = written["id"].as_u64().unwrap();

    let response = json!({"id": id, "result": {"product": "Chrome/140"}});
    in_tx
        .unbounded_send(Ok(Message::Text(response.to_string().into())))
        .unwrap();

    let result = send.await.unwrap().unwrap();
    assert_eq!(result["product"], "Chrome/140");
}

#[tokio::test]
async fn protocol_error_is_surfaced() {
    let (conn, mut out_rx, in_tx) = fake_connection();

    let send = tokio::spawn(async move {
        conn.send_raw("Page.navigate", Some(json!({"url": "x"})), Some("S1"))
            .await
    });

    let written = next_written_frame(&mut out_rx).await;
    assert_eq!(written["sessionId"], "S1");
    let id = written["id"].as_u64().unwrap();

    let response = json!({
        "id": id,
        "error": {"code": -32000, "message": "Cannot navigate to invalid URL", "data": null}
    });
    in_tx
        .unbounded_send(Ok(Message::Text(response.to_string().into())))
        .unwrap();

    let err = send.await.unwrap().unwrap_err();
    match err {
        CdpError::Protocol { code, message } => {
            assert_eq!(code, -32000);
            assert!(message.contains("invalid URL"));
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn events_are_broadcast_to_subscribers() {
    let (conn, _out_rx, in_tx) = fake_connection();
    let mut events = conn.subscribe_events();

    let event = json!({
        "method": "Target.targetCreated",
        "params": {"targetInfo": {
            "targetId": "T1", "type": "page", "title": "", "url": "about:blank",
            "attached": false
        }},
    });
    in_tx
        .unbounded_send(Ok(Message::Text(event.to_string().into())))
        .unwrap();

    let received = events.recv().await.unwrap();
    assert_eq!(received.method, "Target.targetCreated");
    assert!(received.session_id.is_none());
}

#[tokio::test]
async fn closing_the_stream_fails_in_flight_commands() {
    let (conn, mut out_rx, in_tx) = fake_connection();

    let send = tokio::spawn(async move {
        conn.send_raw("Target.getTargets", None, None).await
    });

    // Wait for the command to actually hit the wire, then drop the reader.
    let _ = next_written_frame(&mut out_rx).await;
    drop(in_tx);

    let err = send.await.unwrap().unwrap_err();
    assert!(matches!(err, CdpError::ConnectionLost));
    assert!(err.is_target_closed());
}
