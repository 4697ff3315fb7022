//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by all subsystems
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    access_denials: AtomicU64,
    events_recorded: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_generations: AtomicU64,
    cache_generation_failures: AtomicU64,
    cache_files_purged: AtomicU64,
    exports_scheduled: AtomicU64,
    exports_completed: AtomicU64,
    exports_failed: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_access_denials(&self) {
        self.access_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_recorded(&self) {
        self.events_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_generations(&self) {
        self.cache_generations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_generation_failures(&self) {
        self.cache_generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_cache_files_purged(&self, count: u64) {
        self.cache_files_purged.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_exports_scheduled(&self) {
        self.exports_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_exports_completed(&self) {
        self.exports_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_exports_failed(&self) {
        self.exports_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            access_denials: self.access_denials.load(Ordering::Relaxed),
            events_recorded: self.events_recorded.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_generations: self.cache_generations.load(Ordering::Relaxed),
            cache_generation_failures: self.cache_generation_failures.load(Ordering::Relaxed),
            cache_files_purged: self.cache_files_purged.load(Ordering::Relaxed),
            exports_scheduled: self.exports_scheduled.load(Ordering::Relaxed),
            exports_completed: self.exports_completed.load(Ordering::Relaxed),
            exports_failed: self.exports_failed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub access_denials: u64,
    pub events_recorded: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_generations: u64,
    pub cache_generation_failures: u64,
    pub cache_files_purged: u64,
    pub exports_scheduled: u64,
    pub exports_completed: u64,
    pub exports_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.cache_hits, 0);
        assert_eq!(snapshot.exports_completed, 0);
        assert_eq!(snapshot.events_recorded, 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_cache_hits();
        registry.increment_cache_hits();
        registry.increment_cache_misses();
        registry.add_cache_files_purged(3);
        registry.increment_exports_failed();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.cache_hits, 2);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.cache_files_purged, 3);
        assert_eq!(snapshot.exports_failed, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_access_denials();

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["access_denials"], 1);
    }
}
