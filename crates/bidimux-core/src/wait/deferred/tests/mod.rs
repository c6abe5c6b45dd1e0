use std::time::Duration;

use super::*;

#[tokio::test]
async fn resolve_then_wait() {
    let deferred = Deferred::new();
    assert!(deferred.resolve(42));
    assert_eq!(deferred.wait().await, 42);
}

#[tokio::test]
async fn wait_then_resolve() {
    let deferred: Deferred<&'static str> = Deferred::new();
    let waiter = {
        let deferred = deferred.clone();
        tokio::spawn(async move { deferred.wait().await })
    };

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(!deferred.is_settled());
    assert!(deferred.resolve("done"));

    assert_eq!(waiter.await.unwrap(), "done");
}

#[tokio::test]
async fn first_resolution_wins() {
    let deferred = Deferred::new();
    assert!(deferred.resolve(1));
    assert!(!deferred.resolve(2));
    assert_eq!(deferred.peek(), Some(1));
    assert_eq!(deferred.wait().await, 1);
}

#[tokio::test]
async fn many_waiters_observe_the_same_value() {
    let deferred: Deferred<String> = Deferred::new();
    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let deferred = deferred.clone();
            tokio::spawn(async move { deferred.wait().await })
        })
        .collect();

    deferred.resolve("ready".to_string());
    for waiter in waiters {
        assert_eq!(waiter.await.unwrap(), "ready");
    }
}
