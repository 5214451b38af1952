#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::metrics::Metrics;
use crate::store::ListStore;

pub const DEFAULT_SECONDS: u64 = 20;
pub const DEFAULT_MEM_MB: usize = 0;

/// Resolved parameters of a single `/burn` call.
///
/// Every field is already clamped to its valid range; a `LoadRequest` never
/// carries a zero duration or a zero worker count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub seconds: u64,
    pub workers: usize,
    pub mem_mb: usize,
}

impl LoadRequest {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

/// Optional upper bounds applied after parsing. `None` leaves a field unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BurnLimits {
    pub max_seconds: Option<u64>,
    pub max_workers: Option<usize>,
    pub max_mem_mb: Option<usize>,
}

impl BurnLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_seconds.is_none() && self.max_workers.is_none() && self.max_mem_mb.is_none()
    }
}

/// Process-wide context handed to the HTTP handlers.
///
/// The load generator itself never sees this; `/burn` only reads `limits`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListStore>,
    pub metrics: Metrics,
    pub limits: BurnLimits,
}

impl AppState {
    pub fn new(store: Arc<dyn ListStore>, metrics: Metrics, limits: BurnLimits) -> Self {
        Self {
            store,
            metrics,
            limits,
        }
    }
}
