#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::{bail, Context, Result as AnyResult};
use std::str::FromStr;

use crate::domain::BurnLimits;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_REDIS_HOST: &str = "localhost";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> AnyResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => bail!(format!("unsupported store backend: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind: String,
    pub redis_host: String,
    pub backend: StoreBackend,
    pub limits: BurnLimits,
}

impl AppConfig {
    /// Environment variables:
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `REDIS_HOST` (default `localhost`)
    /// - `STORE_BACKEND`: `redis` or `memory` (default `redis`)
    /// - `BURN_MAX_SECONDS`, `BURN_MAX_WORKERS`, `BURN_MAX_MEM_MB`: optional caps
    pub fn from_env() -> AnyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AnyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let bind = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let redis_host =
            non_empty("REDIS_HOST").unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string());
        let backend = match non_empty("STORE_BACKEND") {
            Some(v) => v.parse::<StoreBackend>().context("STORE_BACKEND")?,
            None => StoreBackend::Redis,
        };
        let limits = BurnLimits {
            max_seconds: parse_cap(non_empty("BURN_MAX_SECONDS"), "BURN_MAX_SECONDS")?,
            max_workers: parse_cap(non_empty("BURN_MAX_WORKERS"), "BURN_MAX_WORKERS")?,
            max_mem_mb: parse_cap(non_empty("BURN_MAX_MEM_MB"), "BURN_MAX_MEM_MB")?,
        };
        Ok(Self {
            bind,
            redis_host,
            backend,
            limits,
        })
    }
}

fn parse_cap<T>(raw: Option<String>, name: &str) -> AnyResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .with_context(|| format!("{name}: invalid value {v:?}"))
    })
    .transpose()
}
