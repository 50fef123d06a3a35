//! Test that abandoned streams do not leak their worker or cursor.

use std::time::Duration;

use crate::e2e_tests::helpers::*;
use crate::scan::StreamEvent;

async fn wait_until(mut done: impl FnMut() -> bool) {
    let result = tokio::time::timeout(Duration::from_secs(1), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "condition not reached in time");
}

#[tokio::test]
async fn test_consumer_stops_early_and_cancels() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=100);

    let mut stream = db.read(Some("items"), None).unwrap();
    for _ in 0..3 {
        assert!(matches!(stream.recv().await, StreamEvent::Record(_)));
    }
    stream.cancel();

    wait_until(|| stream.is_worker_finished()).await;
    assert_eq!(db.store().open_cursors(), 0);
}

#[tokio::test]
async fn test_token_cancels_from_elsewhere() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=100);

    let stream = db.read(Some("items"), None).unwrap();
    let token = stream.cancellation_token();
    tokio::spawn(async move { token.cancel() }).await.unwrap();

    wait_until(|| stream.is_worker_finished()).await;
    assert_eq!(db.store().open_cursors(), 0);
}

#[tokio::test]
async fn test_dropped_streams_release_cursors() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=100);

    for _ in 0..10 {
        let mut stream = db.read(Some("items"), None).unwrap();
        let _ = stream.recv().await;
    }

    let store = db.store().clone();
    wait_until(move || store.open_cursors() == 0).await;
}
