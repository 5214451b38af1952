#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::hint::black_box;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::barrier::completion_barrier;

const SEED: f64 = 0.0001;
const RESET_ABOVE: f64 = 1e9;
// Far enough out to never fire on its own; keeps `Instant` arithmetic in range.
const FAR_FUTURE: Duration = Duration::from_secs(0xFFFF_FFFF);

/// Expiry shared by every worker of one burn.
///
/// Expires at `at` or as soon as `cancel` fires, whichever comes first.
#[derive(Clone, Debug)]
pub struct Deadline {
    at: Instant,
    cancel: CancellationToken,
}

impl Deadline {
    /// Durations beyond roughly 136 years saturate there.
    pub fn after(duration: Duration, cancel: CancellationToken) -> Self {
        Self {
            at: Instant::now() + duration.min(FAR_FUTURE),
            cancel,
        }
    }

    /// Non-blocking poll.
    pub fn expired(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.at
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolOutcome {
    pub spawned: usize,
    pub acknowledged: usize,
}

/// Busy-loop until `deadline` expires. Returns the final accumulator.
pub fn spin(deadline: &Deadline) -> f64 {
    let mut x = SEED;
    while !deadline.expired() {
        x += x.sqrt();
        if x > RESET_ABOVE {
            x = SEED;
        }
        x = black_box(x);
    }
    x
}

/// Run `workers` busy loops on the blocking pool until `deadline` expires,
/// returning once each of them has acknowledged termination.
pub async fn burn_cpu(workers: usize, deadline: Deadline) -> PoolOutcome {
    let (barrier, signals) = completion_barrier(workers);
    let spawned = signals.len();
    for (idx, signal) in signals.into_iter().enumerate() {
        let deadline = deadline.clone();
        // Detached: the barrier is the only join point.
        drop(tokio::task::spawn_blocking(move || {
            let x = spin(&deadline);
            debug!(worker = idx, x, "worker done");
            signal.complete();
        }));
    }
    let acknowledged = barrier.wait().await;
    if acknowledged < spawned {
        warn!(spawned, acknowledged, "workers exited without signalling");
    }
    PoolOutcome {
        spawned,
        acknowledged,
    }
}
