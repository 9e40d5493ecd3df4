//! Orchestrator counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of the orchestrator counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrchestratorStats {
    /// Resolutions served from a fresh stored group
    pub hits: u64,
    /// Resolutions that went to the provider
    pub misses: u64,
    /// Stale groups deleted before refetching
    pub evictions: u64,
    /// Groups written through to the store
    pub writes: u64,
    /// Provider calls that answered with no data
    pub empty_results: u64,
    /// Provider calls that failed (including timeouts)
    pub fetch_failures: u64,
}

impl OrchestratorStats {
    /// Fraction of resolutions served from the store.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub writes: AtomicU64,
    pub empty_results: AtomicU64,
    pub fetch_failures: AtomicU64,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OrchestratorStats {
        OrchestratorStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            empty_results: self.empty_results.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }
}
