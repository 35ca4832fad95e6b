//! Operation counters for the cache facade (`metrics` feature).
//!
//! Counters are plain integers bumped inside the cache's own critical
//! section; a [`CacheMetricsSnapshot`] is a detached point-in-time copy.

/// Internal counters owned by the cache.
#[derive(Debug, Default)]
pub(crate) struct CacheMetrics {
    pub(crate) get_calls: u64,
    pub(crate) get_hits: u64,
    pub(crate) get_misses: u64,
    pub(crate) insert_calls: u64,
    pub(crate) insert_updates: u64,
    pub(crate) insert_new: u64,
    pub(crate) evictions: u64,
}

impl CacheMetrics {
    pub(crate) fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    pub(crate) fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    pub(crate) fn record_insert_update(&mut self) {
        self.insert_calls += 1;
        self.insert_updates += 1;
    }

    pub(crate) fn record_insert_new(&mut self) {
        self.insert_calls += 1;
        self.insert_new += 1;
    }

    pub(crate) fn record_insert_rejected(&mut self) {
        self.insert_calls += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}
