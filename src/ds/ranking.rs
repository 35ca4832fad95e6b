//! Bounded top-N ranking over a max-heap with lazy stale-entry skipping.
//!
//! Scores change often (every play bumps one), so the heap is never edited in
//! place: an update writes the authoritative score into a map and pushes a
//! fresh heap entry stamped with a sequence number. Readers skip heap entries
//! whose stamp no longer matches the map. When stale entries pile up the heap
//! is rebuilt from the map.
//!
//! ```text
//!   scores: FxHashMap<K, (score, seq)>     heap: BinaryHeap<RankEntry>
//!   ┌───────┬────────────┐                 ("A", 10, seq=6)  ← live
//!   │  "A"  │ (10, 6)    │                 ("B",  3, seq=5)  ← live
//!   │  "B"  │ ( 3, 5)    │                 ("A",  7, seq=2)  ← stale, skipped
//!   └───────┴────────────┘
//! ```
//!
//! Ties at equal score resolve to the earlier sequence number, so two keys
//! that reached the same score rank in first-touched order.

use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Rebuild once the heap holds this many entries beyond twice the live set.
const REBUILD_SLACK: usize = 64;

#[derive(Debug, Clone)]
struct RankEntry<K> {
    score: u64,
    seq: u64,
    key: K,
}

impl<K> PartialEq for RankEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl<K> Eq for RankEntry<K> {}

impl<K> PartialOrd for RankEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for RankEntry<K> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap on score; among equal scores the earlier stamp wins.
        self.score
            .cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Score ranking with O(log n) updates and bounded descending reads.
///
/// # Example
///
/// ```
/// use playcache::ds::TopRanking;
///
/// let mut ranking = TopRanking::new();
/// ranking.update("a", 3);
/// ranking.update("b", 5);
/// ranking.update("a", 6);
///
/// assert_eq!(ranking.top(2), vec![("a", 6), ("b", 5)]);
/// ```
#[derive(Debug)]
pub struct TopRanking<K> {
    scores: FxHashMap<K, (u64, u64)>,
    heap: BinaryHeap<RankEntry<K>>,
    seq: u64,
}

impl<K> TopRanking<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty ranking.
    pub fn new() -> Self {
        Self {
            scores: FxHashMap::default(),
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Returns the number of ranked keys.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` if nothing is ranked.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Returns the current score for `key`.
    pub fn score_of(&self, key: &K) -> Option<u64> {
        self.scores.get(key).map(|&(score, _)| score)
    }

    /// Sets or replaces the score for `key`. Earlier heap entries for the
    /// key go stale and are skipped on read.
    pub fn update(&mut self, key: K, score: u64) {
        self.seq += 1;
        self.scores.insert(key.clone(), (score, self.seq));
        self.heap.push(RankEntry {
            score,
            seq: self.seq,
            key,
        });
        self.maybe_rebuild();
    }

    /// Drops `key` from the ranking, returning its last score.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        self.scores.remove(key).map(|(score, _)| score)
    }

    /// Returns up to `n` `(key, score)` pairs, highest score first; equal
    /// scores rank in first-touched order. Non-destructive.
    ///
    /// # Example
    ///
    /// ```
    /// use playcache::ds::TopRanking;
    ///
    /// let mut ranking = TopRanking::new();
    /// ranking.update("x", 2);
    /// ranking.update("y", 2);
    ///
    /// // Same score: "x" was touched first.
    /// assert_eq!(ranking.top(5), vec![("x", 2), ("y", 2)]);
    /// assert_eq!(ranking.top(0), vec![]);
    /// ```
    pub fn top(&self, n: usize) -> Vec<(K, u64)> {
        if n == 0 || self.scores.is_empty() {
            return Vec::new();
        }
        let mut scratch = self.heap.clone();
        let mut out = Vec::with_capacity(n.min(self.scores.len()));
        while let Some(entry) = scratch.pop() {
            let live = self
                .scores
                .get(&entry.key)
                .is_some_and(|&(_, seq)| seq == entry.seq);
            if !live {
                continue;
            }
            out.push((entry.key, entry.score));
            if out.len() == n {
                break;
            }
        }
        out
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.scores.clear();
        self.heap.clear();
        self.seq = 0;
    }

    fn maybe_rebuild(&mut self) {
        if self.heap.len() > self.scores.len() * 2 + REBUILD_SLACK {
            self.heap = self
                .scores
                .iter()
                .map(|(key, &(score, seq))| RankEntry {
                    score,
                    seq,
                    key: key.clone(),
                })
                .collect();
        }
    }
}

impl<K> Default for TopRanking<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
