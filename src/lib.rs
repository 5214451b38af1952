#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

pub mod barrier;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod lib_cpu;
pub mod lib_mem;
pub mod metrics;
pub mod service;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use domain::{AppState, BurnLimits, LoadRequest};
pub use http::{build_state, routes, serve};
pub use http::{burn, env_dump, healthz, list_push, list_range, scrape_metrics, store_info};
pub use metrics::Metrics;
pub use service::{run_burn, BurnReport};
pub use store::{ListStore, MemoryStore, RedisStore};
pub use validation::{apply_limits, resolve_load};
