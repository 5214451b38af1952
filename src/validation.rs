#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::num::NonZeroUsize;

use crate::domain::{BurnLimits, LoadRequest, DEFAULT_MEM_MB, DEFAULT_SECONDS};

/// Number of workers used when the caller does not ask for a specific count.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Parse the three raw `/burn` parameters into a [`LoadRequest`].
///
/// Missing or non-integer values fall back to their defaults, then each field
/// is clamped from below (`seconds >= 1`, `workers >= 1`, `mem_mb >= 0`).
/// No upper bound is applied here; see [`apply_limits`].
pub fn resolve_load(
    seconds: Option<&str>,
    workers: Option<&str>,
    mem_mb: Option<&str>,
    default_workers: usize,
) -> LoadRequest {
    let seconds = int_or(seconds, i64::try_from(DEFAULT_SECONDS).unwrap_or(i64::MAX)).max(1);
    let workers = int_or(workers, i64::try_from(default_workers).unwrap_or(i64::MAX)).max(1);
    let mem_mb = int_or(mem_mb, i64::try_from(DEFAULT_MEM_MB).unwrap_or(0)).max(0);
    LoadRequest {
        seconds: seconds.unsigned_abs(),
        workers: usize::try_from(workers).unwrap_or(usize::MAX),
        mem_mb: usize::try_from(mem_mb).unwrap_or(usize::MAX),
    }
}

/// Resolve from decoded query pairs. The first occurrence of a key wins.
pub fn resolve_query(pairs: &[(String, String)], default_workers: usize) -> LoadRequest {
    let first = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };
    resolve_load(
        first("seconds"),
        first("workers"),
        first("mem_mb"),
        default_workers,
    )
}

/// Clamp a resolved request to the configured caps.
pub fn apply_limits(req: LoadRequest, limits: &BurnLimits) -> LoadRequest {
    LoadRequest {
        seconds: limits
            .max_seconds
            .map_or(req.seconds, |cap| req.seconds.min(cap.max(1))),
        workers: limits
            .max_workers
            .map_or(req.workers, |cap| req.workers.min(cap.max(1))),
        mem_mb: limits.max_mem_mb.map_or(req.mem_mb, |cap| req.mem_mb.min(cap)),
    }
}

fn int_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(default)
}
