#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod lfu;

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentLfuCache;
pub use lfu::LfuCache;
