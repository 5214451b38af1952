#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result as AnyResult};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub const STORE_OPS: [&str; 4] = ["lrange", "rpush", "info", "ping"];

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub store_operations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> AnyResult<Self> {
        let registry = Registry::new();
        let store_operations = IntCounterVec::new(
            Opts::new(
                "dojo_redis_operations_total",
                "Count of Redis operations by type",
            ),
            &["op"],
        )
        .context("create store_operations")?;
        registry
            .register(Box::new(store_operations.clone()))
            .context("register store_operations")?;
        for op in STORE_OPS {
            let _ = store_operations.with_label_values(&[op]);
        }
        #[cfg(target_os = "linux")]
        registry
            .register(Box::new(
                prometheus::process_collector::ProcessCollector::for_self(),
            ))
            .context("register process collector")?;
        Ok(Self {
            registry,
            store_operations,
        })
    }

    pub fn record_store_op(&self, op: &str) {
        self.store_operations.with_label_values(&[op]).inc();
    }

    pub fn store_op_count(&self, op: &str) -> u64 {
        self.store_operations.with_label_values(&[op]).get()
    }

    pub fn encode_text(&self) -> AnyResult<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        encoder.encode(&mf, &mut buf).context("encode metrics")?;
        Ok(buf)
    }
}
