use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use super::*;

#[tokio::test]
async fn forwards_in_submission_order_regardless_of_completion_order() {
    let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
    let queue = ProcessingQueue::new(sink_tx);

    let (first_tx, first_rx) = oneshot::channel::<u32>();
    queue.enqueue(async move { first_rx.await.unwrap() });
    queue.enqueue_ready(2);
    queue.enqueue_ready(3);

    // Nothing can pass the unresolved head of the queue.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(sink_rx.try_recv().is_err());

    first_tx.send(1).unwrap();
    assert_eq!(sink_rx.recv().await, Some(1));
    assert_eq!(sink_rx.recv().await, Some(2));
    assert_eq!(sink_rx.recv().await, Some(3));
}

#[tokio::test]
async fn ready_items_flow_through() {
    let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
    let queue = ProcessingQueue::new(sink_tx);

    for i in 0..5 {
        queue.enqueue_ready(i);
    }
    for i in 0..5 {
        assert_eq!(sink_rx.recv().await, Some(i));
    }
}

#[tokio::test]
async fn clones_share_the_same_order() {
    let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
    let queue = ProcessingQueue::new(sink_tx);
    let clone = queue.clone();

    queue.enqueue_ready("a");
    clone.enqueue_ready("b");
    queue.enqueue_ready("c");

    assert_eq!(sink_rx.recv().await, Some("a"));
    assert_eq!(sink_rx.recv().await, Some("b"));
    assert_eq!(sink_rx.recv().await, Some("c"));
}
