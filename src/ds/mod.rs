pub mod arena;
pub mod freq_buckets;
pub mod ranking;

pub use arena::{NodeArena, NodeId};
pub use freq_buckets::{DescendingEntries, FrequencyBuckets};
pub use ranking::TopRanking;
