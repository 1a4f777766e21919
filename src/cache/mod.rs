//! Cache Module
//!
//! In-memory response cache with per-entry TTL, lazy expiry, and sweeping.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::{ResponseCache, SharedCache};
