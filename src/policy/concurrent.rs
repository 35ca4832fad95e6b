//! Lock-wrapped cache for shared use (`concurrency` feature).
//!
//! Every public operation takes the one lock for its whole duration, so each
//! call is a single atomic critical section: no caller can observe an entry
//! between buckets or a half-applied promotion. A `Mutex` rather than a
//! read-write lock because reads promote — every operation is a writer.
//!
//! Methods return owned values; references into the cache cannot outlive the
//! critical section.

use std::hash::Hash;

use parking_lot::Mutex;

use crate::policy::lfu::LfuCache;
use crate::traits::ConcurrentCache;

/// Thread-safe wrapper around [`LfuCache`] with a whole-cache lock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use playcache::policy::concurrent::ConcurrentLfuCache;
///
/// let cache = Arc::new(ConcurrentLfuCache::new(64));
///
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let cache = Arc::clone(&cache);
///         thread::spawn(move || {
///             for i in 0..16u64 {
///                 cache.insert(t * 100 + i, i);
///                 cache.get(&(t * 100 + i));
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(cache.len(), 64);
/// ```
#[derive(Debug)]
pub struct ConcurrentLfuCache<K, V> {
    inner: Mutex<LfuCache<K, V>>,
}

impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LfuCache::new(capacity)),
        }
    }

    /// Inserts or updates an entry; an overwrite counts as an access.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().insert(key, value)
    }

    /// Returns a clone of the value for `key`, bumping its frequency.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the value without touching eviction state.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Checks if `key` is cached without touching eviction state.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the maximum capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Returns the access frequency recorded for `key`.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Removes and returns the eviction candidate.
    pub fn pop_lfu(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lfu()
    }

    /// Returns up to `n` `(key, value, frequency)` triples, frequency
    /// descending, ties most recently touched first.
    pub fn top_n(&self, n: usize) -> Vec<(K, V, u64)> {
        self.inner.lock().top_n(n)
    }
}

impl<K, V> ConcurrentCache for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn basic_ops_through_the_lock() {
        let cache = ConcurrentLfuCache::new(2);
        cache.insert("a", 1u64);
        cache.insert("b", 2);

        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3); // evicts "b": sole frequency-1 entry
        assert!(!cache.contains(&"b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.top_n(1), vec![("a", 1, 2)]);
    }

    #[test]
    fn concurrent_inserts_respect_capacity() {
        let cache = Arc::new(ConcurrentLfuCache::new(32));
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..256u64 {
                        cache.insert(t * 1000 + i, i);
                        cache.get(&(t * 1000 + (i % 8)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 32);
    }
}
