//! Frequency buckets with recency-ordered entries for O(1) LFU eviction.
//!
//! Entries live in a [`NodeArena`] and carry their own `prev`/`next` handles,
//! so moving one between buckets is a constant-time splice. Buckets are keyed
//! by access frequency and chained to their frequency neighbors; a tracked
//! minimum makes the eviction candidate reachable without a search.
//!
//! ```text
//!   entries: NodeArena<Entry>          buckets: FxHashMap<u64, Bucket>
//!   ┌──────┬──────────────────────┐
//!   │ id_0 │ freq:2, prev/next    │    min_freq = 1
//!   │ id_1 │ freq:1, prev/next    │        │
//!   │ id_2 │ freq:1, prev/next    │        ▼
//!   └──────┴──────────────────────┘    freq=1: head ─► [id_2] ◄─► [id_1] ◄─ tail
//!                                                      newest        oldest
//!                                      freq=2: head ─► [id_0] ◄─ tail
//!
//!                                      bucket links: freq=1 ─next─► freq=2
//! ```
//!
//! Promotion unlinks the entry from its bucket, deletes the bucket the moment
//! it empties (a stale empty bucket would corrupt the minimum and with it the
//! eviction choice), bumps the frequency by one, and pushes the entry to the
//! head of the neighboring bucket. Eviction pops the *tail* of the minimum
//! bucket: the least recently touched entry among the least frequent.
//!
//! The structure tracks no key index of its own; callers address entries by
//! [`NodeId`] and keep whatever key lookup they need on top.

use rustc_hash::FxHashMap;

use crate::ds::arena::{NodeArena, NodeId};
use crate::error::InvariantError;

/// Bucket-map pre-allocation. Access counts cluster at low frequencies, so a
/// handful of buckets covers the common case.
const BUCKET_PREALLOC: usize = 16;

#[derive(Debug)]
struct Entry<K, V> {
    // Link handles first; they are touched on every promote and evict.
    prev: Option<NodeId>,
    next: Option<NodeId>,
    freq: u64,
    key: K,
    value: V,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<NodeId>,
    tail: Option<NodeId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Frequency-keyed buckets of recency-ordered entries.
///
/// Each entry belongs to exactly one bucket; its position within the bucket
/// encodes recency (head = most recently touched). No bucket is ever left
/// empty, so the tracked minimum frequency always names a populated bucket.
///
/// # Example
///
/// ```
/// use playcache::ds::FrequencyBuckets;
///
/// let mut buckets = FrequencyBuckets::new();
/// let a = buckets.insert_new("a", 0u64);
/// buckets.insert_new("b", 0);
///
/// buckets.promote(a);
/// assert_eq!(buckets.frequency_of(a), Some(2));
///
/// // "b" is the victim: lowest frequency, oldest within it.
/// assert_eq!(buckets.evict_one(), Some(("b", 0, 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K, V> {
    entries: NodeArena<Entry<K, V>>,
    buckets: FxHashMap<u64, Bucket>,
    /// Smallest populated frequency; 0 means the structure is empty.
    min_freq: u64,
}

impl<K, V> FrequencyBuckets<K, V> {
    /// Creates an empty structure.
    pub fn new() -> Self {
        Self {
            entries: NodeArena::new(),
            buckets: FxHashMap::with_capacity_and_hasher(BUCKET_PREALLOC, Default::default()),
            min_freq: 0,
        }
    }

    /// Creates an empty structure with entry storage reserved for `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: NodeArena::with_capacity(capacity),
            buckets: FxHashMap::with_capacity_and_hasher(BUCKET_PREALLOC, Default::default()),
            min_freq: 0,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the smallest populated frequency, if any.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Returns the frequency recorded for `id`.
    pub fn frequency_of(&self, id: NodeId) -> Option<u64> {
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Returns the key stored under `id`.
    pub fn key_of(&self, id: NodeId) -> Option<&K> {
        self.entries.get(id).map(|entry| &entry.key)
    }

    /// Returns the value stored under `id`.
    pub fn value(&self, id: NodeId) -> Option<&V> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value stored under `id`.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.entries.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Inserts a new entry with frequency 1 at the head of the frequency-1
    /// bucket, creating the bucket below the current minimum if absent.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::ds::FrequencyBuckets;
    ///
    /// let mut buckets = FrequencyBuckets::new();
    /// let id = buckets.insert_new("track", 7u64);
    /// assert_eq!(buckets.frequency_of(id), Some(1));
    /// assert_eq!(buckets.min_freq(), Some(1));
    /// ```
    pub fn insert_new(&mut self, key: K, value: V) -> NodeId {
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key,
            value,
        });

        if !self.buckets.contains_key(&1) {
            let next = (self.min_freq != 0).then_some(self.min_freq);
            self.insert_bucket(1, None, next);
        }
        self.push_front(1, id);
        // Frequency 1 is the global minimum whenever it is populated.
        self.min_freq = 1;
        id
    }

    /// Bumps the frequency of `id` by one and moves it to the head of the
    /// next bucket. Returns the new frequency, or `None` for a stale handle.
    ///
    /// At `u64::MAX` the frequency saturates and the entry only moves to the
    /// head of its current bucket.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::ds::FrequencyBuckets;
    ///
    /// let mut buckets = FrequencyBuckets::new();
    /// let id = buckets.insert_new("track", 0u64);
    /// assert_eq!(buckets.promote(id), Some(2));
    /// assert_eq!(buckets.promote(id), Some(3));
    /// assert_eq!(buckets.min_freq(), Some(3));
    /// ```
    pub fn promote(&mut self, id: NodeId) -> Option<u64> {
        let freq = self.entries.get(id)?.freq;
        if freq == u64::MAX {
            self.unlink(freq, id);
            self.push_front(freq, id);
            return Some(freq);
        }
        let next_freq = freq + 1;

        let (chain_prev, chain_next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        self.unlink(freq, id);
        let emptied = self.bucket_is_empty(freq);
        if emptied {
            self.remove_bucket(freq, chain_prev, chain_next);
            if self.min_freq == freq {
                self.min_freq = chain_next.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if emptied { chain_prev } else { Some(freq) };
            self.insert_bucket(next_freq, prev, chain_next);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next_freq;
        }
        self.push_front(next_freq, id);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }

        Some(next_freq)
    }

    /// Removes `id` and returns its `(key, value, frequency)`.
    pub fn remove(&mut self, id: NodeId) -> Option<(K, V, u64)> {
        let freq = self.entries.get(id)?.freq;
        let (chain_prev, chain_next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        self.unlink(freq, id);
        if self.bucket_is_empty(freq) {
            self.remove_bucket(freq, chain_prev, chain_next);
            if self.min_freq == freq {
                self.min_freq = chain_next.unwrap_or(0);
            }
        }

        self.entries
            .remove(id)
            .map(|entry| (entry.key, entry.value, entry.freq))
    }

    /// Removes and returns the eviction victim: the tail of the minimum
    /// bucket, the least recently touched entry among the least frequent.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::ds::FrequencyBuckets;
    ///
    /// let mut buckets = FrequencyBuckets::new();
    /// buckets.insert_new("a", 0u64);
    /// buckets.insert_new("b", 0);
    /// let c = buckets.insert_new("c", 0);
    /// buckets.promote(c);
    ///
    /// assert_eq!(buckets.evict_one(), Some(("a", 0, 1)));
    /// assert_eq!(buckets.evict_one(), Some(("b", 0, 1)));
    /// assert_eq!(buckets.evict_one(), Some(("c", 0, 2)));
    /// assert_eq!(buckets.evict_one(), None);
    /// ```
    pub fn evict_one(&mut self) -> Option<(K, V, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.tail?;
        self.remove(id)
    }

    /// Peeks the eviction victim without removing it.
    pub fn peek_victim(&self) -> Option<(&K, &V, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let id = self.buckets.get(&self.min_freq)?.tail?;
        let entry = self.entries.get(id)?;
        Some((&entry.key, &entry.value, entry.freq))
    }

    /// Iterates entries by frequency descending; within one frequency, most
    /// recently touched first. The order mirrors the head-insertion
    /// discipline exactly, so ties are deterministic.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::ds::FrequencyBuckets;
    ///
    /// let mut buckets = FrequencyBuckets::new();
    /// let a = buckets.insert_new("a", 1u64);
    /// buckets.insert_new("b", 2);
    /// buckets.promote(a);
    ///
    /// let order: Vec<_> = buckets.iter_descending().map(|(k, _, f)| (*k, f)).collect();
    /// assert_eq!(order, vec![("a", 2), ("b", 1)]);
    /// ```
    pub fn iter_descending(&self) -> DescendingEntries<'_, K, V> {
        let top = (self.min_freq != 0).then(|| {
            let mut freq = self.min_freq;
            while let Some(next) = self.buckets.get(&freq).and_then(|bucket| bucket.next) {
                freq = next;
            }
            freq
        });
        DescendingEntries {
            owner: self,
            bucket: top,
            node: None,
        }
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Validates the structure without panicking.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.is_empty() {
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("empty structure holds buckets"));
            }
            if self.min_freq != 0 {
                return Err(InvariantError::new("empty structure has a min frequency"));
            }
            return Ok(());
        }

        if self.min_freq == 0 {
            return Err(InvariantError::new("populated structure lost its minimum"));
        }
        if !self.buckets.contains_key(&self.min_freq) {
            return Err(InvariantError::new("min frequency names a missing bucket"));
        }

        let mut chained = 0usize;
        for (&freq, bucket) in &self.buckets {
            match bucket.prev {
                Some(prev) => {
                    let ok = self
                        .buckets
                        .get(&prev)
                        .is_some_and(|other| other.next == Some(freq));
                    if prev >= freq || !ok {
                        return Err(InvariantError::new(format!(
                            "bucket {freq} has a broken prev link"
                        )));
                    }
                },
                None => {
                    if freq != self.min_freq {
                        return Err(InvariantError::new(format!(
                            "bucket {freq} has no prev but is not the minimum"
                        )));
                    }
                },
            }
            if let Some(next) = bucket.next {
                let ok = self
                    .buckets
                    .get(&next)
                    .is_some_and(|other| other.prev == Some(freq));
                if next <= freq || !ok {
                    return Err(InvariantError::new(format!(
                        "bucket {freq} has a broken next link"
                    )));
                }
            }

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = current {
                let entry = self
                    .entries
                    .get(id)
                    .ok_or_else(|| InvariantError::new("bucket links a missing entry"))?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry in bucket {freq} records frequency {}",
                        entry.freq
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new("entry prev link out of sync"));
                }
                last = Some(id);
                current = entry.next;
                count += 1;
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!("bucket {freq} tail is stale")));
            }
            if count == 0 {
                return Err(InvariantError::new(format!("bucket {freq} is empty")));
            }
            chained += count;
        }

        if chained != self.len() {
            return Err(InvariantError::new("bucket chains disagree with entry count"));
        }
        Ok(())
    }

    /// Panicking variant of [`check_invariants`](Self::check_invariants) for
    /// tests and debug builds.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("frequency bucket invariant violated: {err}");
        }
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .is_none_or(|bucket| bucket.head.is_none())
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(bucket) = self.buckets.get_mut(&prev)
        {
            bucket.next = next;
        }
        if let Some(next) = next
            && let Some(bucket) = self.buckets.get_mut(&next)
        {
            bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn push_front(&mut self, freq: u64, id: NodeId) {
        let bucket = self.buckets.get_mut(&freq).expect("bucket missing");
        let old_head = bucket.head;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(head) => {
                if let Some(entry) = self.entries.get_mut(head) {
                    entry.prev = Some(id);
                }
            },
            None => bucket.tail = Some(id),
        }
        bucket.head = Some(id);
    }

    fn unlink(&mut self, freq: u64, id: NodeId) {
        let (prev, next) = match self.entries.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };

        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.entries.get_mut(prev_id) {
                    entry.next = next;
                }
            },
            None => bucket.head = next,
        }
        match next {
            Some(next_id) => {
                if let Some(entry) = self.entries.get_mut(next_id) {
                    entry.prev = prev;
                }
            },
            None => bucket.tail = prev,
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }
    }
}

impl<K, V> Default for FrequencyBuckets<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in frequency-descending, recency-descending order.
#[derive(Debug)]
pub struct DescendingEntries<'a, K, V> {
    owner: &'a FrequencyBuckets<K, V>,
    /// Bucket to enter once the current chain is exhausted.
    bucket: Option<u64>,
    /// Next node to yield within the current chain.
    node: Option<NodeId>,
}

impl<'a, K, V> Iterator for DescendingEntries<'a, K, V> {
    type Item = (&'a K, &'a V, u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.node {
                let entry = self.owner.entries.get(id)?;
                self.node = entry.next;
                return Some((&entry.key, &entry.value, entry.freq));
            }
            let freq = self.bucket?;
            let bucket = self.owner.buckets.get(&freq)?;
            self.node = bucket.head;
            self.bucket = bucket.prev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_keys<V>(buckets: &FrequencyBuckets<&'static str, V>) -> Vec<(&'static str, u64)> {
        buckets.iter_descending().map(|(k, _, f)| (*k, f)).collect()
    }

    #[test]
    fn insert_starts_at_frequency_one() {
        let mut buckets = FrequencyBuckets::new();
        let id = buckets.insert_new("a", 0u64);
        assert_eq!(buckets.frequency_of(id), Some(1));
        assert_eq!(buckets.min_freq(), Some(1));
        assert_eq!(buckets.len(), 1);
        buckets.debug_validate_invariants();
    }

    #[test]
    fn promote_moves_between_buckets_and_tracks_minimum() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert_new("a", 0u64);
        let b = buckets.insert_new("b", 0);

        assert_eq!(buckets.promote(a), Some(2));
        assert_eq!(buckets.min_freq(), Some(1));
        buckets.debug_validate_invariants();

        assert_eq!(buckets.promote(b), Some(2));
        // Frequency-1 bucket emptied and was deleted.
        assert_eq!(buckets.min_freq(), Some(2));
        buckets.debug_validate_invariants();
    }

    #[test]
    fn promote_skips_over_gap_to_existing_bucket() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert_new("a", 0u64);
        let b = buckets.insert_new("b", 0);
        buckets.promote(a);
        buckets.promote(a); // a at 3
        buckets.promote(b); // b at 2, buckets 2 and 3 both live
        assert_eq!(buckets.min_freq(), Some(2));
        buckets.debug_validate_invariants();

        // b joins a's bucket; bucket 2 disappears.
        assert_eq!(buckets.promote(b), Some(3));
        assert_eq!(buckets.min_freq(), Some(3));
        assert_eq!(drain_keys(&buckets), vec![("b", 3), ("a", 3)]);
        buckets.debug_validate_invariants();
    }

    #[test]
    fn evict_one_pops_oldest_of_least_frequent() {
        let mut buckets = FrequencyBuckets::new();
        buckets.insert_new("a", 0u64);
        buckets.insert_new("b", 0);
        let c = buckets.insert_new("c", 0);
        buckets.promote(c);

        assert_eq!(buckets.evict_one(), Some(("a", 0, 1)));
        buckets.debug_validate_invariants();
        assert_eq!(buckets.evict_one(), Some(("b", 0, 1)));
        assert_eq!(buckets.min_freq(), Some(2));
        assert_eq!(buckets.evict_one(), Some(("c", 0, 2)));
        assert_eq!(buckets.evict_one(), None);
        assert!(buckets.is_empty());
        buckets.debug_validate_invariants();
    }

    #[test]
    fn promoted_entry_becomes_most_recent_in_target_bucket() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert_new("a", 0u64);
        let b = buckets.insert_new("b", 0);
        buckets.promote(a);
        buckets.promote(b);

        // Both at frequency 2; b was promoted last, so it is newest.
        assert_eq!(drain_keys(&buckets), vec![("b", 2), ("a", 2)]);
        assert_eq!(buckets.peek_victim().map(|(k, _, f)| (*k, f)), Some(("a", 2)));
    }

    #[test]
    fn remove_unlinks_and_cleans_bucket() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert_new("a", 1u64);
        let b = buckets.insert_new("b", 2);
        buckets.promote(b);

        assert_eq!(buckets.remove(b), Some(("b", 2, 2)));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.min_freq(), Some(1));
        buckets.debug_validate_invariants();

        assert_eq!(buckets.remove(a), Some(("a", 1, 1)));
        assert_eq!(buckets.min_freq(), None);
        buckets.debug_validate_invariants();
    }

    #[test]
    fn descending_iteration_orders_by_frequency_then_recency() {
        let mut buckets = FrequencyBuckets::new();
        let a = buckets.insert_new("a", 0u64);
        let b = buckets.insert_new("b", 0);
        buckets.insert_new("c", 0);
        buckets.promote(a);
        buckets.promote(b);
        buckets.promote(b);

        // b: freq 3; a: freq 2; c: freq 1.
        assert_eq!(drain_keys(&buckets), vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn value_mut_updates_in_place() {
        let mut buckets = FrequencyBuckets::new();
        let id = buckets.insert_new("a", 1u64);
        *buckets.value_mut(id).unwrap() = 9;
        assert_eq!(buckets.value(id), Some(&9));
        assert_eq!(buckets.key_of(id), Some(&"a"));
    }

    #[test]
    fn clear_resets() {
        let mut buckets = FrequencyBuckets::new();
        buckets.insert_new("a", 0u64);
        buckets.clear();
        assert!(buckets.is_empty());
        assert_eq!(buckets.min_freq(), None);
        assert!(buckets.check_invariants().is_ok());
    }
}
