//! Track catalog and playback plumbing around the favourites cache.
//!
//! The player owns the domain side of the system: track metadata, the
//! caller-maintained play tallies, a doubly-linked cursor for the current
//! track, and two ranked views of listening habits. The cache itself stays
//! policy-only — the player increments a tally on every play and re-submits
//! it, so the tally is the cached *value* while the cache's own frequency
//! counter is the eviction priority.
//!
//! Two rankings exist side by side, as in the system this was lifted from:
//! the authoritative one read back from [`LfuCache::top_n`], and a max-heap
//! [`TopRanking`] fed the same tallies.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::ds::arena::{NodeArena, NodeId};
use crate::ds::ranking::TopRanking;
use crate::policy::lfu::LfuCache;

/// Default capacity of the favourites cache.
pub const DEFAULT_FAVOURITES_CAPACITY: usize = 100;

/// Immutable track metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub duration_secs: u32,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// Stable catalog handle for a track.
///
/// Identity never changes once issued, so it is safe to use as a cache key
/// for the whole life of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(usize);

impl TrackId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct CursorNode {
    track: TrackId,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Catalog, tallies, cursor, and ranked favourites in one place.
///
/// # Example
///
/// ```
/// use playcache::player::Player;
///
/// let mut player = Player::new();
/// let shape = player.add_track("Shape of You", "Ed Sheeran", 235);
/// player.add_track("Uptown Funk", "Mark Ronson ft. Bruno Mars", 270);
///
/// player.play_current();
/// player.play_current();
///
/// assert_eq!(player.play_count(shape), 2);
/// let top = player.top_tracks(1);
/// assert_eq!(top[0].0, shape);
/// assert_eq!(top[0].1, 2); // plays
/// ```
#[derive(Debug)]
pub struct Player {
    tracks: Vec<Track>,
    by_title: FxHashMap<String, TrackId>,
    tallies: FxHashMap<TrackId, u64>,
    favourites: LfuCache<TrackId, u64>,
    ranking: TopRanking<TrackId>,
    cursor_nodes: NodeArena<CursorNode>,
    current: Option<NodeId>,
}

impl Player {
    /// Creates a player with the default favourites capacity.
    pub fn new() -> Self {
        Self::with_favourites_capacity(DEFAULT_FAVOURITES_CAPACITY)
    }

    /// Creates a player whose favourites cache holds at most `capacity`
    /// tracks.
    pub fn with_favourites_capacity(capacity: usize) -> Self {
        Self {
            tracks: Vec::new(),
            by_title: FxHashMap::default(),
            tallies: FxHashMap::default(),
            favourites: LfuCache::new(capacity),
            ranking: TopRanking::new(),
            cursor_nodes: NodeArena::new(),
            current: None,
        }
    }

    /// Registers a track with a zero tally and seeds the cursor if this is
    /// the first track.
    ///
    /// A duplicate title replaces the previous title-index entry; the older
    /// track stays in the catalog under its id.
    pub fn add_track(
        &mut self,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
    ) -> TrackId {
        let id = TrackId(self.tracks.len());
        let track = Track {
            title: title.into(),
            artist: artist.into(),
            duration_secs,
        };
        self.by_title.insert(track.title.clone(), id);
        debug!(track = %track, id = id.index(), "track added");
        self.tracks.push(track);
        self.tallies.insert(id, 0);
        self.favourites.insert(id, 0);

        // TODO: chain newly added tracks to their neighbors once the intended
        // playlist order is decided; today only the first track seeds the
        // cursor and navigation stops there.
        if self.current.is_none() {
            self.current = Some(self.cursor_nodes.insert(CursorNode {
                track: id,
                prev: None,
                next: None,
            }));
        }
        id
    }

    /// Returns the number of catalogued tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Looks up track metadata by id.
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    /// Looks up a track id by exact title.
    pub fn track_by_title(&self, title: &str) -> Option<TrackId> {
        self.by_title.get(title).copied()
    }

    /// Returns the track the cursor points at.
    pub fn current_track(&self) -> Option<TrackId> {
        let node = self.cursor_nodes.get(self.current?)?;
        Some(node.track)
    }

    /// Plays the track under the cursor, bumping its tally.
    pub fn play_current(&mut self) -> Option<TrackId> {
        let id = self.current_track()?;
        self.record_play(id);
        Some(id)
    }

    /// Advances the cursor along its `next` link and plays that track.
    /// Returns `None` (cursor unmoved) when no link exists.
    pub fn play_next(&mut self) -> Option<TrackId> {
        let next = self.cursor_nodes.get(self.current?)?.next?;
        self.current = Some(next);
        let id = self.cursor_nodes.get(next)?.track;
        self.record_play(id);
        Some(id)
    }

    /// Steps the cursor back along its `prev` link and plays that track.
    /// Returns `None` (cursor unmoved) when no link exists.
    pub fn play_previous(&mut self) -> Option<TrackId> {
        let prev = self.cursor_nodes.get(self.current?)?.prev?;
        self.current = Some(prev);
        let id = self.cursor_nodes.get(prev)?.track;
        self.record_play(id);
        Some(id)
    }

    /// Returns the play tally for a track; 0 for unknown ids.
    pub fn play_count(&self, id: TrackId) -> u64 {
        self.tallies.get(&id).copied().unwrap_or(0)
    }

    /// Ranked favourites read back from the cache: up to `n`
    /// `(id, plays, frequency)` triples, frequency descending, ties most
    /// recently touched first.
    pub fn top_tracks(&self, n: usize) -> Vec<(TrackId, u64, u64)> {
        self.favourites.top_n(n)
    }

    /// Ranked plays read from the max-heap side: up to `n` `(id, plays)`
    /// pairs, plays descending, ties first-played first.
    pub fn ranked_by_plays(&self, n: usize) -> Vec<(TrackId, u64)> {
        self.ranking.top(n)
    }

    fn record_play(&mut self, id: TrackId) {
        let tally = self.tallies.entry(id).or_insert(0);
        *tally += 1;
        let tally = *tally;

        self.ranking.update(id, tally);
        // The tally is the cached value; the cache keeps its own access
        // frequency for eviction.
        self.favourites.insert(id, tally);

        if let Some(track) = self.tracks.get(id.0) {
            info!(track = %track, plays = tally, "now playing");
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
