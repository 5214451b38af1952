#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use dojo_agent::store::{ListStore, MemoryStore, RedisStore, StoreError};

#[tokio::test]
async fn memory_push_and_range() {
    let s = MemoryStore::default();
    assert!(s.range("guestbook").await.expect("range").is_empty());
    s.push("guestbook", "a").await.expect("push");
    s.push("guestbook", "b").await.expect("push");
    assert_eq!(s.range("guestbook").await.expect("range"), vec!["a", "b"]);
    assert!(s.range("other").await.expect("range").is_empty());
}

#[tokio::test]
async fn memory_outage_fails_every_op() {
    let s = MemoryStore::default();
    s.set_available(false);
    assert!(matches!(s.ping().await, Err(StoreError::Unavailable)));
    assert!(s.push("k", "v").await.is_err());
    assert!(s.range("k").await.is_err());
    assert!(s.info().await.is_err());
    s.set_available(true);
    assert!(s.ping().await.is_ok());
}

#[tokio::test]
async fn memory_info_reports_keyspace() {
    let s = MemoryStore::default();
    s.push("k", "v").await.expect("push");
    let info = s.info().await.expect("info");
    assert!(info.contains("keys:1"));
    assert!(info.contains("items:1"));
}

#[test]
fn redis_client_does_not_connect_eagerly() {
    assert!(RedisStore::new("203.0.113.1").is_ok());
}
