//! Metrics registry
//!
//! Counters only, monotonic, reset on process start. Relaxed atomics: the
//! values are exact once all writers are done, but readers may see any
//! interleaving while searches are in flight.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    searches_executed: AtomicU64,
    searches_empty: AtomicU64,
    searches_failed: AtomicU64,
    terms_dropped: AtomicU64,
    path_rebuilds: AtomicU64,
    paths_written: AtomicU64,
    units_ingested: AtomicU64,
    links_deferred: AtomicU64,
    links_unresolved: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Search

    pub fn increment_searches_executed(&self) {
        self.searches_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_searches_empty(&self) {
        self.searches_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_searches_failed(&self) {
        self.searches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_terms_dropped(&self, count: u64) {
        self.terms_dropped.fetch_add(count, Ordering::Relaxed);
    }

    // Section paths

    pub fn increment_path_rebuilds(&self) {
        self.path_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_paths_written(&self, count: u64) {
        self.paths_written.fetch_add(count, Ordering::Relaxed);
    }

    // Ingestion

    pub fn add_units_ingested(&self, count: u64) {
        self.units_ingested.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_links_deferred(&self, count: u64) {
        self.links_deferred.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_links_unresolved(&self, count: u64) {
        self.links_unresolved.fetch_add(count, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches_executed: self.searches_executed.load(Ordering::Relaxed),
            searches_empty: self.searches_empty.load(Ordering::Relaxed),
            searches_failed: self.searches_failed.load(Ordering::Relaxed),
            terms_dropped: self.terms_dropped.load(Ordering::Relaxed),
            path_rebuilds: self.path_rebuilds.load(Ordering::Relaxed),
            paths_written: self.paths_written.load(Ordering::Relaxed),
            units_ingested: self.units_ingested.load(Ordering::Relaxed),
            links_deferred: self.links_deferred.load(Ordering::Relaxed),
            links_unresolved: self.links_unresolved.load(Ordering::Relaxed),
        }
    }

    /// All counters as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub searches_executed: u64,
    pub searches_empty: u64,
    pub searches_failed: u64,
    pub terms_dropped: u64,
    pub path_rebuilds: u64,
    pub paths_written: u64,
    pub units_ingested: u64,
    pub links_deferred: u64,
    pub links_unresolved: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.searches_executed, 0);
        assert_eq!(snapshot.paths_written, 0);
        assert_eq!(snapshot.links_unresolved, 0);
    }

    #[test]
    fn test_counters() {
        let registry = MetricsRegistry::new();
        registry.increment_searches_executed();
        registry.increment_searches_executed();
        registry.increment_searches_empty();
        registry.add_terms_dropped(3);
        registry.increment_path_rebuilds();
        registry.add_paths_written(12);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.searches_executed, 2);
        assert_eq!(snapshot.searches_empty, 1);
        assert_eq!(snapshot.terms_dropped, 3);
        assert_eq!(snapshot.path_rebuilds, 1);
        assert_eq!(snapshot.paths_written, 12);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.add_units_ingested(5);
        let json = registry.to_json();
        assert_eq!(json["units_ingested"], 5);
        assert_eq!(json["searches_failed"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_searches_executed();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.snapshot().searches_executed, 800);
    }
}
