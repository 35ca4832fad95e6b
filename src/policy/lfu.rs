//! # LFU (Least Frequently Used) Cache
//!
//! Bounded cache that evicts the least frequently accessed entry when full,
//! resolving ties between equally-frequent entries to the least recently
//! touched one. All hot-path operations are O(1) amortized.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                         LfuCache<K, V>                            │
//!   │                                                                   │
//!   │   index: FxHashMap<K, NodeId>        (key → entry handle)         │
//!   │   buckets: FrequencyBuckets<K, V>    (entries + eviction order)   │
//!   │   capacity: usize                                                 │
//!   │                                                                   │
//!   │   freq=1: head ─► [newest] ◄──► [oldest] ◄─ tail (evict first)   │
//!   │   freq=2: head ─► [ ... ]                                        │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! ```text
//!   insert(key, value)
//!     key present?  → replace value, promote (an overwrite is an access)
//!     capacity 0?   → no-op (permanently disabled cache)
//!     cache full?   → evict tail of the minimum-frequency bucket,
//!                     drop the victim from the index
//!     then          → new entry at frequency 1, head position
//!
//!   get(key)
//!     absent → None, no state change
//!     hit    → promote, return the value
//! ```
//!
//! ## Complexity
//!
//! | Operation  | Time  | Notes                                 |
//! |------------|-------|---------------------------------------|
//! | `insert`   | O(1)  | Including eviction                    |
//! | `get`      | O(1)  | Promotes on hit                       |
//! | `pop_lfu`  | O(1)  | Tail of the minimum bucket            |
//! | `top_n`    | O(d + n) | d = distinct frequencies present   |
//! | `clear`    | O(n)  |                                       |
//!
//! ## Zero Capacity
//!
//! `LfuCache::new(0)` builds a cache that stores nothing: every `insert` is a
//! no-op and every `get` misses. This is a documented degenerate
//! configuration, not an error.
//!
//! ## Thread Safety
//!
//! `LfuCache` is not thread-safe; `get` and `insert` both mutate eviction
//! state. Use `ConcurrentLfuCache` (feature `concurrency`) to share one
//! instance across threads behind a single lock.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::arena::NodeId;
use crate::ds::freq_buckets::FrequencyBuckets;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

/// Bounded LFU cache with recency tie-breaking.
///
/// # Example
///
/// ```
/// use playcache::policy::lfu::LfuCache;
///
/// let mut cache = LfuCache::new(2);
/// cache.insert("a", 0u64);
/// cache.insert("b", 0);
/// cache.insert("c", 0);        // evicts "a": frequency tie, oldest loses
/// assert!(!cache.contains(&"a"));
///
/// cache.get(&"b");             // "b" → frequency 2
/// cache.insert("c", 5);        // overwrite counts as an access: "c" → 2
///
/// assert_eq!(cache.top_n(2), vec![("c", 5, 2), ("b", 0, 2)]);
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V> {
    index: FxHashMap<K, NodeId>,
    buckets: FrequencyBuckets<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// `capacity == 0` disables storage entirely; see the module docs.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FrequencyBuckets::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Inserts or updates an entry, returning the previous value if the key
    /// was present.
    ///
    /// Updating an existing key promotes it: the overwrite counts as an
    /// access. Inserting a new key into a full cache first evicts the least
    /// frequently used entry (ties: least recently touched).
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let slot = self.buckets.value_mut(id).expect("cache entry missing");
            let previous = std::mem::replace(slot, value);
            self.buckets.promote(id);
            return Some(previous);
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_rejected();
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() == self.capacity {
            let (victim, _, _) = self.buckets.evict_one().expect("full cache has a victim");
            self.index.remove(&victim);
            #[cfg(feature = "metrics")]
            self.metrics.record_eviction();
        }

        let id = self.buckets.insert_new(key.clone(), value);
        self.index.insert(key, id);
        None
    }

    /// Returns the value for `key`, bumping its frequency by one.
    ///
    /// A miss changes no state. `None` is the explicit absent indicator;
    /// values are never conflated with a sentinel.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.buckets.promote(id);
        self.buckets.value(id)
    }

    /// Returns the value for `key` without touching eviction state.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.buckets.value(id)
    }

    /// Checks if `key` is cached without touching eviction state.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries; capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.buckets.clear();
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.buckets.remove(id).map(|(_, value, _)| value)
    }

    /// Returns the access frequency recorded for `key`.
    ///
    /// Frequency starts at 1 on insert and rises by one per `get` or
    /// overwriting `insert`. It is the eviction priority, not the value.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.buckets.frequency_of(id)
    }

    /// Removes and returns the eviction candidate.
    pub fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (key, value, _) = self.buckets.evict_one()?;
        self.index.remove(&key);
        Some((key, value))
    }

    /// Peeks the eviction candidate without removing or promoting it.
    pub fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.buckets.peek_victim().map(|(key, value, _)| (key, value))
    }

    /// Returns up to `n` `(key, value, frequency)` triples ordered by
    /// frequency descending; within a frequency, most recently touched
    /// first. `n == 0` yields an empty vector; `n >= len` yields everything.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(4);
    /// cache.insert("a", 1u64);
    /// cache.insert("b", 2);
    /// cache.get(&"a");
    ///
    /// assert_eq!(cache.top_n(10), vec![("a", 1, 2), ("b", 2, 1)]);
    /// assert!(cache.top_n(0).is_empty());
    /// ```
    pub fn top_n(&self, n: usize) -> Vec<(K, V, u64)>
    where
        V: Clone,
    {
        self.buckets
            .iter_descending()
            .take(n)
            .map(|(key, value, freq)| (key.clone(), value.clone(), freq))
            .collect()
    }

    /// Validates internal bookkeeping without panicking.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;
        if self.index.len() != self.buckets.len() {
            return Err(InvariantError::new("index and buckets disagree on size"));
        }
        if self.len() > self.capacity {
            return Err(InvariantError::new("entry count exceeds capacity"));
        }
        for (key, &id) in &self.index {
            if self.buckets.key_of(id) != Some(key) {
                return Err(InvariantError::new("index maps a key to a foreign entry"));
            }
        }
        Ok(())
    }

    /// Panicking variant of [`check_invariants`](Self::check_invariants) for
    /// tests and debug builds.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("cache invariant violated: {err}");
        }
    }

    /// Snapshots the cache's operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evictions: self.metrics.evictions,
            len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LfuCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LfuCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        LfuCache::pop_lfu(self)
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        LfuCache::peek_lfu(self)
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        LfuCache::frequency(self, key)
    }

    fn top_n(&self, n: usize) -> Vec<(K, V, u64)> {
        LfuCache::top_n(self, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_returns_none_without_state_change() {
        let mut cache: LfuCache<&str, u64> = LfuCache::new(2);
        cache.insert("a", 0);
        assert_eq!(cache.get(&"missing"), None);
        assert_eq!(cache.frequency(&"a"), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn get_bumps_only_the_touched_key() {
        let mut cache = LfuCache::new(3);
        cache.insert("a", 0u64);
        cache.insert("b", 0);

        assert_eq!(cache.get(&"a"), Some(&0));
        assert_eq!(cache.frequency(&"a"), Some(2));
        assert_eq!(cache.frequency(&"b"), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn overwrite_updates_value_and_promotes() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 1u64);
        assert_eq!(cache.insert("a", 2), Some(1));
        assert_eq!(cache.peek(&"a"), Some(&2));
        assert_eq!(cache.frequency(&"a"), Some(2));
        cache.debug_validate_invariants();
    }

    #[test]
    fn eviction_picks_least_frequent_least_recent() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 0u64);
        cache.insert("b", 0);
        cache.get(&"a");

        // "b" is the sole frequency-1 entry.
        cache.insert("c", 0);
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"a"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn eviction_tie_breaks_by_recency() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 0u64);
        cache.insert("b", 0);

        // Tie at frequency 1; "a" is older.
        cache.insert("c", 0);
        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_disables_storage() {
        let mut cache = LfuCache::new(0);
        assert_eq!(cache.insert("a", 1u64), None);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert!(cache.top_n(10).is_empty());
        cache.debug_validate_invariants();
    }

    #[test]
    fn top_n_orders_and_truncates() {
        let mut cache = LfuCache::new(4);
        cache.insert("a", 10u64);
        cache.insert("b", 20);
        cache.insert("c", 30);
        cache.get(&"b");
        cache.get(&"b");
        cache.get(&"c");

        // b: 3, c: 2, a: 1.
        assert_eq!(
            cache.top_n(10),
            vec![("b", 20, 3), ("c", 30, 2), ("a", 10, 1)]
        );
        assert_eq!(cache.top_n(1), vec![("b", 20, 3)]);
        assert!(cache.top_n(0).is_empty());
    }

    #[test]
    fn worked_sequence_matches_expected_states() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 0u64);
        cache.insert("b", 0);
        cache.insert("c", 0); // evicts "a"
        assert!(!cache.contains(&"a"));

        assert_eq!(cache.get(&"b"), Some(&0)); // b → 2
        cache.insert("c", 5); // c → value 5, freq 2, most recent

        assert_eq!(cache.top_n(2), vec![("c", 5, 2), ("b", 0, 2)]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn pop_and_peek_lfu() {
        let mut cache = LfuCache::new(3);
        cache.insert(1u64, "one");
        cache.insert(2, "two");
        cache.get(&2);

        assert_eq!(cache.peek_lfu(), Some((&1, &"one")));
        assert_eq!(cache.pop_lfu(), Some((1, "one")));
        assert_eq!(cache.pop_lfu(), Some((2, "two")));
        assert_eq!(cache.pop_lfu(), None);
        cache.debug_validate_invariants();
    }

    #[test]
    fn remove_then_reinsert_starts_fresh() {
        let mut cache = LfuCache::new(2);
        cache.insert("a", 1u64);
        cache.get(&"a");
        assert_eq!(cache.frequency(&"a"), Some(2));

        assert_eq!(cache.remove(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), None);

        cache.insert("a", 2);
        assert_eq!(cache.frequency(&"a"), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn instances_are_independent() {
        let mut first = LfuCache::new(1);
        let mut second = LfuCache::new(1);
        first.insert("k", 1u64);
        second.insert("k", 2u64);
        first.get(&"k");

        assert_eq!(first.frequency(&"k"), Some(2));
        assert_eq!(second.frequency(&"k"), Some(1));
    }

    #[test]
    fn churn_preserves_capacity_invariant() {
        let mut cache = LfuCache::new(8);
        for i in 0..256u64 {
            cache.insert(i % 32, i);
            if i % 3 == 0 {
                cache.get(&(i % 16));
            }
            assert!(cache.len() <= cache.capacity());
        }
        cache.debug_validate_invariants();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_hits_misses_and_evictions() {
        let mut cache = LfuCache::new(1);
        cache.insert("a", 1u64);
        cache.insert("a", 2); // update
        cache.insert("b", 3); // evicts "a"
        cache.get(&"b");
        cache.get(&"a");

        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.insert_calls, 3);
        assert_eq!(snapshot.insert_updates, 1);
        assert_eq!(snapshot.insert_new, 2);
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.get_hits, 1);
        assert_eq!(snapshot.get_misses, 1);
        assert_eq!(snapshot.len, 1);
        assert_eq!(snapshot.capacity, 1);
    }
}
