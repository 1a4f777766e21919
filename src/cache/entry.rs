//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached response with its storage time and lifetime.
///
/// The value is type-erased; `downcast` recovers it as the type the caller
/// expects.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    value: Arc<dyn Any + Send + Sync>,
    /// When the value was written
    pub stored_at: Instant,
    /// How long the value stays valid after `stored_at`
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new<T>(value: T, ttl: Duration) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::stored_at(value, Instant::now(), ttl)
    }

    /// Creates an entry with an explicit storage time.
    pub fn stored_at<T>(value: T, stored_at: Instant, ttl: Duration) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            value: Arc::new(value),
            stored_at,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// An entry stays valid while `now - stored_at <= ttl`, so it expires
    /// strictly after the TTL has elapsed.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.stored_at.elapsed())
    }

    // == Downcast ==
    /// Returns a clone of the value if it has type `T`.
    pub fn downcast<T>(&self) -> Option<T>
    where
        T: Any + Clone,
    {
        self.value.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("stored_at", &self.stored_at)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
