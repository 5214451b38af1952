#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::LoadRequest;
use crate::lib_cpu::{burn_cpu, Deadline};
use crate::lib_mem::MemoryPressure;

#[derive(Clone, Copy, Debug)]
pub struct BurnReport {
    pub request: LoadRequest,
    pub blocks: usize,
    pub spawned: usize,
    pub acknowledged: usize,
    pub elapsed: Duration,
}

/// Commit `req.mem_mb` MiB, burn `req.workers` workers for `req.seconds`, then
/// release the memory.
///
/// Cancelling `cancel` ends the burn early. A panicking allocation is resumed
/// on the caller, never turned into an error value.
pub async fn run_burn(req: LoadRequest, cancel: CancellationToken) -> BurnReport {
    let started = Instant::now();
    let mem_mb = req.mem_mb;
    let allocation = tokio::task::spawn_blocking(move || MemoryPressure::allocate(mem_mb));
    let pressure = match allocation.await {
        Ok(pressure) => pressure,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    };
    let blocks = pressure.len();
    info!(blocks, bytes = pressure.total_bytes(), "memory committed");

    let deadline = Deadline::after(req.duration(), cancel);
    let outcome = burn_cpu(req.workers, deadline).await;
    drop(pressure);

    BurnReport {
        request: req,
        blocks,
        spawned: outcome.spawned,
        acknowledged: outcome.acknowledged,
        elapsed: started.elapsed(),
    }
}

