//! Cache Housekeeping Task
//!
//! Background task that periodically purges expired cache entries. Reads
//! already drop expired entries lazily; this sweep bounds memory held by
//! entries that are written once and never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheManager;

/// Spawns a background task that periodically purges expired cache entries.
///
/// Each run logs a summary of the store after the sweep.
///
/// # Arguments
/// * `cache` - Shared handle to the cache store
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: CacheManager, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            let stats = cache.stats().await;

            if removed > 0 {
                info!(
                    removed,
                    entries = stats.entry_count,
                    size_bytes = stats.total_size_bytes,
                    "Cache cleanup: purged expired entries"
                );
            } else {
                debug!(
                    entries = stats.entry_count,
                    size_bytes = stats.total_size_bytes,
                    "Cache cleanup: no expired entries found"
                );
            }
        }
    })
}
