//! In-process pipeline counters, reported periodically at `info` level.
//! No external metrics exporter is in scope; this is ambient bookkeeping
//! so operators can see throughput and cache effectiveness in the logs.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated by the worker pool and side-service clients.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub items_seen: AtomicU64,
    pub items_skipped: AtomicU64,
    pub items_clean: AtomicU64,
    pub items_logged: AtomicU64,
    pub alerts_emitted: AtomicU64,
    pub permutation_cache_hits: AtomicU64,
    pub permutation_cache_misses: AtomicU64,
    pub whois_cache_hits: AtomicU64,
    pub whois_cache_misses: AtomicU64,
}

impl PipelineMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_seen(&self) {
        self.items_seen.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_skipped(&self) {
        self.items_skipped.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_clean(&self) {
        self.items_clean.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_logged(&self) {
        self.items_logged.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_alerts(&self) {
        self.alerts_emitted.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_permutation_cache(&self, hit: bool) {
        if hit {
            self.permutation_cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.permutation_cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }
    pub fn inc_whois_cache(&self, hit: bool) {
        if hit {
            self.whois_cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.whois_cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot the counters into a plain struct suitable for logging.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_seen: self.items_seen.load(Ordering::Relaxed),
            items_skipped: self.items_skipped.load(Ordering::Relaxed),
            items_clean: self.items_clean.load(Ordering::Relaxed),
            items_logged: self.items_logged.load(Ordering::Relaxed),
            alerts_emitted: self.alerts_emitted.load(Ordering::Relaxed),
            permutation_cache_hits: self.permutation_cache_hits.load(Ordering::Relaxed),
            permutation_cache_misses: self.permutation_cache_misses.load(Ordering::Relaxed),
            whois_cache_hits: self.whois_cache_hits.load(Ordering::Relaxed),
            whois_cache_misses: self.whois_cache_misses.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time read of [`PipelineMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub items_seen: u64,
    pub items_skipped: u64,
    pub items_clean: u64,
    pub items_logged: u64,
    pub alerts_emitted: u64,
    pub permutation_cache_hits: u64,
    pub permutation_cache_misses: u64,
    pub whois_cache_hits: u64,
    pub whois_cache_misses: u64,
}
