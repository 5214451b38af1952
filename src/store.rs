#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use async_trait::async_trait;
use parking_lot::Mutex;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store unavailable")]
    Unavailable,
}

/// Named lists plus liveness, the subset of a key-value store the service uses.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError>;
    async fn push(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn info(&self) -> Result<String, StoreError>;
}

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Does not connect; each operation opens its own connection.
    pub fn new(host: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(format!("redis://{host}:6379/"))?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl ListStore for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let mut con = self.conn().await?;
        let members: Vec<String> = con.lrange(key, 0, -1).await?;
        Ok(members)
    }

    async fn push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut con = self.conn().await?;
        let _: i64 = con.rpush(key, value).await?;
        Ok(())
    }

    async fn info(&self) -> Result<String, StoreError> {
        let mut con = self.conn().await?;
        let info: String = redis::cmd("INFO").query_async(&mut con).await?;
        Ok(info)
    }
}

/// In-process store for local runs and tests.
pub struct MemoryStore {
    lists: Mutex<HashMap<String, Vec<String>>>,
    up: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
            up: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    /// Simulate an outage: every operation fails while `up` is false.
    pub fn set_available(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.up.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.lists.lock().get(key).cloned().unwrap_or_default())
    }

    async fn push(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.lists
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn info(&self) -> Result<String, StoreError> {
        self.check()?;
        let lists = self.lists.lock();
        let items: usize = lists.values().map(Vec::len).sum();
        Ok(format!(
            "# Server\r\nbackend:memory\r\n# Keyspace\r\nkeys:{}\r\nitems:{items}\r\n",
            lists.len()
        ))
    }
}
