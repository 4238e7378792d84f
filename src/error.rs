//! Error types for the bytecache library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned by `check_invariants` when the entry map, the
//!   ordering structure and the byte accounting disagree.
//! - [`ConfigError`]: Returned when cache configuration is invalid
//!   (e.g. an unknown policy name).
//!
//! Cache operations themselves never fail: a miss is `None` and removing an
//! absent key is a no-op.
//!
//! ## Example Usage
//!
//! ```
//! use bytecache::builder::CachePolicy;
//! use bytecache::error::ConfigError;
//!
//! let policy: Result<CachePolicy, ConfigError> = "lfu".parse();
//! assert!(policy.is_ok());
//!
//! let bad = "fifo".parse::<CachePolicy>();
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the cache types
/// (e.g. [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants)).
/// Carries a human-readable description of which invariant failed.
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
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration is invalid.
///
/// Produced when parsing a [`CachePolicy`](crate::builder::CachePolicy) from an
/// unrecognised name.
///
/// # Example
///
/// ```
/// use bytecache::builder::CachePolicy;
///
/// let err = "arc".parse::<CachePolicy>().unwrap_err();
/// assert!(err.to_string().contains("arc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
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

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("used_bytes 12 != sum of sizes 10");
        assert_eq!(err.to_string(), "used_bytes 12 != sum of sizes 10");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("stale heap index");
        assert_eq!(err.message(), "stale heap index");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("unknown cache policy `mru`");
        assert_eq!(err.to_string(), "unknown cache policy `mru`");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.message(), "x");
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
    }
}
