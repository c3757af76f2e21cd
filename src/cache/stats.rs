//! Cache Statistics Module
//!
//! Read-only snapshot of store occupancy and activity.

use serde::Serialize;

use crate::cache::CacheEntry;

// == Cache Stats ==
/// Point-in-time view of the cache store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of live (not yet purged) entries
    pub entry_count: usize,
    /// Sum of serialized payload sizes
    pub total_size_bytes: usize,
    /// `total_size_bytes / entry_count`, 0 when empty
    pub average_size_bytes: f64,
    /// Sum of hit counts over current entries
    pub total_hits: u64,
    /// Earliest `created_at` among current entries
    pub oldest_entry_timestamp: Option<u64>,
    /// Latest `created_at` among current entries
    pub newest_entry_timestamp: Option<u64>,
    /// Entries removed by LRU eviction since startup
    pub evictions: u64,
    /// Entries removed because they expired since startup
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the current entries and lifetime counters.
    pub fn collect<'a>(
        entries: impl Iterator<Item = &'a CacheEntry>,
        total_size_bytes: usize,
        evictions: u64,
        expirations: u64,
    ) -> Self {
        let mut stats = Self {
            total_size_bytes,
            evictions,
            expirations,
            ..Self::default()
        };

        for entry in entries {
            stats.entry_count += 1;
            stats.total_hits += entry.hit_count;
            stats.oldest_entry_timestamp = Some(
                stats
                    .oldest_entry_timestamp
                    .map_or(entry.created_at, |t| t.min(entry.created_at)),
            );
            stats.newest_entry_timestamp = Some(
                stats
                    .newest_entry_timestamp
                    .map_or(entry.created_at, |t| t.max(entry.created_at)),
            );
        }

        if stats.entry_count > 0 {
            stats.average_size_bytes = total_size_bytes as f64 / stats.entry_count as f64;
        }
        stats
    }
}
