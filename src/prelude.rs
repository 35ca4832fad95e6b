pub use crate::ds::{DescendingEntries, FrequencyBuckets, NodeArena, NodeId, TopRanking};
pub use crate::error::InvariantError;
pub use crate::player::{Player, Track, TrackId};
pub use crate::policy::lfu::LfuCache;
pub use crate::traits::{ConcurrentCache, CoreCache, LfuCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::policy::concurrent::ConcurrentLfuCache;
#[cfg(feature = "metrics")]
pub use crate::metrics::CacheMetricsSnapshot;
