use super::*;
use std::sync::atomic::Ordering;
use tokio::time::{sleep, Duration};

#[tokio::test]
async fn ingest_accepts_well_formed_packet_and_rejects_malformed() {
    let (store, _dir) = LogStore::open_temp();
    let store = Arc::new(store);
    let collector = LogCollector::new(store.clone());
    let token = CancellationToken::new();

    let addr = collector
        .run("127.0.0.1:0", || "1970-01-01T00:00:00Z".to_string(), token.clone())
        .await
        .unwrap();

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client
        .send_to(b"<14>1 2026-01-01T00:00:00Z host app1 1 out - hello", addr)
        .await
        .unwrap();
    client
        .send_to(b"<14>1 2026-01-01T00:00:00Z host app1 1 debug - hello", addr)
        .await
        .unwrap();

    sleep(Duration::from_millis(50)).await;
    token.cancel();

    assert_eq!(collector.metrics.accepted.load(Ordering::Relaxed), 1);
    assert_eq!(collector.metrics.malformed.load(Ordering::Relaxed), 1);

    let page = store.get_events(&["app1:out".to_string()], None, 0, 10);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].message, "hello");
}

#[tokio::test(start_paused = true)]
async fn retention_loop_prunes_stale_events_on_tick() {
    let (store, _dir) = LogStore::open_temp();
    store.add_event(
        "app1:out".to_string(),
        "2000-01-01T00:00:00Z".to_string(),
        "ancient".to_string(),
    );
    let store = Arc::new(store);
    let collector = LogCollector::new(store.clone());
    let token = CancellationToken::new();

    collector
        .run("127.0.0.1:0", || "2026-01-01T00:00:00Z".to_string(), token.clone())
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(6)).await;
    sleep(Duration::from_millis(1)).await;
    token.cancel();

    let page = store.get_events(&["app1:out".to_string()], None, 0, 10);
    assert!(page.items.is_empty());
}
