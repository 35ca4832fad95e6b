//! # Cache Trait Hierarchy
//!
//! Defines the interface layers for the cache subsystem so callers can stay
//! generic over the concrete cache while only the policy-appropriate
//! operations are visible.
//!
//! ```text
//!               ┌─────────────────────────────────────────┐
//!               │            CoreCache<K, V>              │
//!               │                                         │
//!               │  insert(&mut, K, V) → Option<V>         │
//!               │  get(&mut, &K) → Option<&V>             │
//!               │  contains(&, &K) → bool                 │
//!               │  len / is_empty / capacity / clear      │
//!               └──────────────────┬──────────────────────┘
//!                                  │
//!                                  ▼
//!               ┌─────────────────────────────────────────┐
//!               │          MutableCache<K, V>             │
//!               │                                         │
//!               │  remove(&K) → Option<V>                 │
//!               │  remove_batch(&[K])                     │
//!               └──────────────────┬──────────────────────┘
//!                                  │
//!                                  ▼
//!               ┌─────────────────────────────────────────┐
//!               │          LfuCacheTrait<K, V>            │
//!               │                                         │
//!               │  pop_lfu() → (K, V)                     │
//!               │  peek_lfu() → (&K, &V)                  │
//!               │  frequency(&K) → u64                    │
//!               │  top_n(n) → Vec<(K, V, u64)>            │
//!               └─────────────────────────────────────────┘
//! ```
//!
//! | Trait             | Extends        | Purpose                              |
//! |-------------------|----------------|--------------------------------------|
//! | `CoreCache`       | -              | Universal cache operations           |
//! | `MutableCache`    | `CoreCache`    | Adds arbitrary key removal           |
//! | `LfuCacheTrait`   | `MutableCache` | Frequency tracking and ranked reads  |
//! | `ConcurrentCache` | `Send + Sync`  | Marker for thread-safe caches        |

/// Core cache operations that all caches support.
///
/// # Example
///
/// ```
/// use playcache::policy::lfu::LfuCache;
/// use playcache::traits::CoreCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LfuCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// At capacity, an entry may be evicted according to the cache's policy
    /// before the new entry is inserted. Overwriting an existing key counts
    /// as an access for policies that track access order.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// Updates the policy's access state. Use [`contains`](Self::contains)
    /// to check existence without affecting eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use playcache::policy::lfu::LfuCache;
/// use playcache::traits::{CoreCache, MutableCache};
///
/// fn invalidate<C: MutableCache<u64, &'static str>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = LfuCache::new(10);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// invalidate(&mut cache, &[1]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair, returning the removed value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys; results are in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// LFU-specific operations: frequency tracking and ranked reads.
///
/// Entries are ordered by access frequency; the least frequently accessed
/// entry is evicted first, and ties resolve to the least recently touched.
///
/// # Example
///
/// ```
/// use playcache::policy::lfu::LfuCache;
/// use playcache::traits::{CoreCache, LfuCacheTrait};
///
/// let mut cache = LfuCache::new(3);
/// cache.insert("a", 1u64);
/// cache.insert("b", 2);
/// cache.get(&"b");
///
/// assert_eq!(cache.frequency(&"b"), Some(2));
/// let (victim, _) = cache.pop_lfu().unwrap();
/// assert_eq!(victim, "a");
/// ```
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least frequently used entry; among equal
    /// frequencies, the least recently touched one.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Peeks at the eviction candidate without removing it or bumping its
    /// frequency.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Returns the access frequency recorded for a key.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Returns up to `n` `(key, value, frequency)` triples, frequency
    /// descending; ties most recently touched first.
    fn top_n(&self, n: usize) -> Vec<(K, V, u64)>;
}

/// Marker trait for caches that are safe to share across threads.
///
/// Implementors guarantee every public operation runs as a single atomic
/// critical section; no partially-applied state is observable.
pub trait ConcurrentCache: Send + Sync {}
