//! Cache Module
//!
//! In-memory response cache with TTL expiration, size-bounded LRU eviction and
//! tag-based invalidation.

mod clock;
mod entry;
mod lru;
mod manager;
mod policy;
mod stats;
mod store;
mod tags;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruIndex;
pub use manager::CacheManager;
pub use policy::CacheConfig;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tags::TagIndex;

// == Public Constants ==
/// Default ceiling on the summed size of cached payloads
pub const DEFAULT_MAX_TOTAL_SIZE: usize = 100 * 1024 * 1024; // 100 MB

/// Default ceiling on the number of cached entries
pub const DEFAULT_MAX_TOTAL_ENTRIES: usize = 10_000;
