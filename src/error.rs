//! Error types for the playcache library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (non-panicking `check_invariants` methods).
//!
//! A zero capacity is deliberately *not* an error: `LfuCache::new(0)` builds
//! a permanently-empty cache whose inserts are no-ops. Absent keys are
//! reported with `Option::None`, never with a sentinel value.
//!
//! ## Example Usage
//!
//! ```
//! use playcache::policy::lfu::LfuCache;
//!
//! let mut cache: LfuCache<&str, u64> = LfuCache::new(4);
//! cache.insert("a", 1);
//! assert!(cache.check_invariants().is_ok());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` methods on the cache and its frequency
/// buckets. Carries a human-readable description of which invariant failed.
/// Given correct bookkeeping these methods always return `Ok`; a failure
/// indicates a bug in this crate, not in the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
