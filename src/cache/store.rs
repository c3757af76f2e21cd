//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, a tag index,
//! size accounting and lazy TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheEntry, CacheStats, Clock, LruIndex, SystemClock, TagIndex};

// == Cache Store ==
/// Bounded response store with LRU eviction and tag invalidation.
///
/// Store operations never fail: anything that prevents a write (an
/// unserializable payload, a payload larger than the whole store) skips the
/// write and is logged.
#[derive(Debug)]
pub struct CacheStore {
    /// Key -> entry storage
    entries: HashMap<String, CacheEntry>,
    /// Access order for eviction
    lru: LruIndex,
    /// Tag -> keys
    tags: TagIndex,
    /// Sum of `size_bytes` over all entries
    total_size: usize,
    /// Ceiling for `total_size`
    max_total_size: usize,
    /// Hard ceiling on entry count across all namespaces
    max_total_entries: usize,
    clock: Arc<dyn Clock>,
    evictions: u64,
    expirations: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store reading the system clock.
    ///
    /// # Arguments
    /// * `max_total_size` - Ceiling on the summed size of cached payloads
    /// * `max_total_entries` - Ceiling on the number of entries
    pub fn new(max_total_size: usize, max_total_entries: usize) -> Self {
        Self::with_clock(max_total_size, max_total_entries, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(
        max_total_size: usize,
        max_total_entries: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruIndex::new(),
            tags: TagIndex::new(),
            total_size: 0,
            max_total_size,
            max_total_entries: max_total_entries.max(1),
            clock,
            evictions: 0,
            expirations: 0,
        }
    }

    // == Get ==
    /// Returns the payload stored under `key` if it is still live.
    ///
    /// A hit bumps the entry's hit count and access time. An expired entry is
    /// removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        let entry = self.entries.get_mut(key)?;

        if entry.is_expired(now) {
            self.remove_entry(key);
            self.expirations += 1;
            debug!(key, "Expired cache entry removed on read");
            return None;
        }

        entry.record_hit(now);
        let payload = entry.payload.clone();
        self.lru.touch(key);
        Some(payload)
    }

    // == Set ==
    /// Stores `payload` under `key` according to `config`.
    ///
    /// Returns whether the entry was stored. A disabled config stores nothing.
    /// An existing entry under the same key is replaced, and LRU entries are
    /// evicted first when the write would break the size or count ceiling.
    pub fn set<T>(&mut self, key: &str, payload: &T, config: &CacheConfig) -> bool
    where
        T: Serialize + ?Sized,
    {
        if !config.is_enabled() {
            return false;
        }

        let (payload, size) = match measure(payload) {
            Ok(measured) => measured,
            Err(err) => {
                warn!(key, error = %err, "Skipping cache write: payload is not serializable");
                return false;
            }
        };

        if size > self.max_total_size {
            warn!(
                key,
                size,
                max = self.max_total_size,
                "Skipping cache write: payload exceeds the cache size ceiling"
            );
            return false;
        }

        self.remove_entry(key);

        let evicted = self.evict_while(|store| {
            store.total_size + size > store.max_total_size
                || store.entries.len() >= store.max_total_entries
        });
        if evicted > 0 {
            debug!(key, evicted, "Evicted LRU entries to make room");
        }

        let entry = CacheEntry::new(key.to_string(), payload, size, config, self.clock.now_ms());
        self.tags.insert(key, &entry.tags);
        self.lru.touch(key);
        self.total_size += size;
        self.entries.insert(key.to_string(), entry);

        self.enforce_namespace_cap(config);
        true
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Delete By Tags ==
    /// Removes every entry carrying any of `tags` and returns how many.
    pub fn delete_by_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let keys = self.tags.keys_for_any(tags);
        keys.iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.tags.clear();
        self.total_size = 0;
    }

    // == Stats ==
    /// Returns a snapshot of the store. Entry access metadata is untouched.
    pub fn stats(&self) -> CacheStats {
        CacheStats::collect(
            self.entries.values(),
            self.total_size,
            self.evictions,
            self.expirations,
        )
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.expirations += expired.len() as u64;
        expired.len()
    }

    // == Inspection ==
    /// Returns the entry under `key` without counting a hit.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size_bytes(&self) -> usize {
        self.total_size
    }

    pub fn max_total_size_bytes(&self) -> usize {
        self.max_total_size
    }

    // == Internals ==
    /// Unlinks an entry from every index and releases its size.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.tags.remove(key, &entry.tags);
        self.total_size = self.total_size.saturating_sub(entry.size_bytes);
        Some(entry)
    }

    /// Evicts the least recently used entry while `over_limit` holds.
    fn evict_while(&mut self, over_limit: impl Fn(&Self) -> bool) -> usize {
        let mut evicted = 0;
        while over_limit(self) {
            let Some(key) = self.lru.pop_oldest() else {
                break;
            };
            if self.remove_entry(&key).is_some() {
                self.evictions += 1;
                evicted += 1;
            }
        }
        evicted
    }

    /// Applies the config's soft cap to the entries sharing its namespace tag.
    ///
    /// Untagged configs cap the whole store instead.
    fn enforce_namespace_cap(&mut self, config: &CacheConfig) {
        if config.max_entries == 0 {
            return;
        }

        let Some(tag) = config.namespace_tag() else {
            self.evict_while(|store| store.entries.len() > config.max_entries);
            return;
        };

        while self.tags.count(tag) > config.max_entries {
            let victim = self
                .lru
                .iter_oldest_first()
                .find(|key| {
                    self.entries
                        .get(*key)
                        .is_some_and(|entry| entry.tags.iter().any(|t| t == tag))
                })
                .map(str::to_string);

            let Some(victim) = victim else {
                break;
            };
            self.remove_entry(&victim);
            self.evictions += 1;
            debug!(key = %victim, tag, "Evicted entry over namespace cap");
        }
    }
}

/// Converts a payload to JSON and measures its serialized length.
fn measure<T: Serialize + ?Sized>(payload: &T) -> serde_json::Result<(Value, usize)> {
    let value = serde_json::to_value(payload)?;
    let size = serde_json::to_string(&value)?.len();
    Ok((value, size))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;
    use std::collections::HashMap;

    const MB: usize = 1024 * 1024;

    fn store_with_clock(max_size: usize, max_entries: usize) -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = CacheStore::with_clock(max_size, max_entries, clock.clone());
        (store, clock)
    }

    fn config(duration_ms: u64, tags: &[&str]) -> CacheConfig {
        CacheConfig::new(duration_ms, 0, tags)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(MB, 100);
        assert!(store.is_empty());
        assert_eq!(store.total_size_bytes(), 0);
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(MB, 100);
        let payload = json!([{"id": "x"}]);

        assert!(store.set("key1", &payload, &config(5000, &[])));

        assert_eq!(store.get("key1"), Some(payload));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(MB, 100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_get_records_hit() {
        let (mut store, clock) = store_with_clock(MB, 100);
        store.set("key1", &json!(1), &config(5000, &[]));

        clock.advance(10);
        store.get("key1");
        store.get("key1");

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.hit_count, 2);
        assert_eq!(entry.last_accessed_at, 1_000_010);
        assert_eq!(entry.created_at, 1_000_000);
    }

    #[test]
    fn test_store_disabled_config_is_noop() {
        let (mut store, _) = store_with_clock(MB, 100);

        assert!(!store.set("key1", &json!("v"), &CacheConfig::disabled()));
        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_overwrite_replaces_size() {
        let (mut store, _) = store_with_clock(MB, 100);

        store.set("key1", &json!("a"), &config(5000, &["cases"]));
        store.set("key1", &json!("abcdef"), &config(5000, &["search"]));

        assert_eq!(store.len(), 1);
        // "\"abcdef\""
        assert_eq!(store.total_size_bytes(), 8);
        assert_eq!(store.get("key1"), Some(json!("abcdef")));
        assert_eq!(store.delete_by_tags(&["cases"]), 0);
        assert_eq!(store.delete_by_tags(&["search"]), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(MB, 100);
        store.set("key1", &json!("v"), &config(5000, &[]));

        clock.advance(5000);
        assert!(store.get("key1").is_some(), "Still live at expires_at");

        clock.advance(1);
        assert_eq!(store.get("key1"), None);
        assert!(!store.contains("key1"), "Expired entry removed on read");
        assert_eq!(store.total_size_bytes(), 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock(MB, 100);
        store.set("key1", &json!("v"), &config(5000, &[]));

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"), "Delete is idempotent");
        assert!(store.is_empty());
        assert_eq!(store.total_size_bytes(), 0);
    }

    #[test]
    fn test_store_delete_by_tags() {
        let (mut store, _) = store_with_clock(MB, 100);
        store.set("c1", &json!(1), &config(5000, &["cases"]));
        store.set("c2", &json!(2), &config(5000, &["cases", "search"]));
        store.set("l1", &json!(3), &config(5000, &["legislation"]));
        store.set("n1", &json!(4), &config(5000, &[]));

        assert_eq!(store.delete_by_tags(&["cases"]), 2);

        assert!(!store.contains("c1"));
        assert!(!store.contains("c2"));
        assert!(store.contains("l1"));
        assert!(store.contains("n1"));
        assert_eq!(store.delete_by_tags(&["search"]), 0);
    }

    #[test]
    fn test_store_delete_by_overlapping_tags_counts_once() {
        let (mut store, _) = store_with_clock(MB, 100);
        store.set("k", &json!(1), &config(5000, &["articles", "search"]));

        assert_eq!(store.delete_by_tags(&["articles", "search"]), 1);
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock(MB, 100);
        store.set("a", &json!(1), &config(5000, &["cases"]));
        store.set("b", &json!(2), &config(5000, &["cases"]));

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.total_size_bytes(), 0);
        assert_eq!(store.delete_by_tags(&["cases"]), 0);
    }

    #[test]
    fn test_store_lru_eviction_by_size() {
        // Each "xxxx" payload serializes to 6 bytes
        let (mut store, clock) = store_with_clock(18, 100);
        let cfg = config(60_000, &[]);

        store.set("A", &json!("aaaa"), &cfg);
        clock.advance(1);
        store.set("B", &json!("bbbb"), &cfg);
        clock.advance(1);
        store.set("C", &json!("cccc"), &cfg);
        clock.advance(1);
        store.get("B");
        clock.advance(1);
        store.get("C");

        store.set("D", &json!("dddd"), &cfg);

        assert!(!store.contains("A"));
        assert_eq!(store.get("B"), Some(json!("bbbb")));
        assert_eq!(store.get("C"), Some(json!("cccc")));
        assert_eq!(store.get("D"), Some(json!("dddd")));
        assert_eq!(store.total_size_bytes(), 18);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with_clock(MB, 3);
        let cfg = config(60_000, &[]);

        store.set("key1", &json!(1), &cfg);
        store.set("key2", &json!(2), &cfg);
        store.set("key3", &json!(3), &cfg);

        store.get("key1");
        store.set("key4", &json!(4), &cfg);

        assert!(store.contains("key1"));
        assert!(!store.contains("key2"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_store_rejects_payload_larger_than_ceiling() {
        let (mut store, _) = store_with_clock(10, 100);
        store.set("small", &json!(1), &config(5000, &[]));

        assert!(!store.set("big", &json!("x".repeat(64)), &config(5000, &[])));
        assert!(store.contains("small"), "Oversized write must not evict");
        assert!(!store.contains("big"));
    }

    #[test]
    fn test_store_skips_unserializable_payload() {
        let (mut store, _) = store_with_clock(MB, 100);
        let mut payload = HashMap::new();
        payload.insert((1u8, 2u8), "tuple keys are not valid JSON object keys");

        assert!(!store.set("key1", &payload, &config(5000, &[])));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_namespace_cap_evicts_within_namespace() {
        let (mut store, _) = store_with_clock(MB, 100);
        let cases = CacheConfig::new(60_000, 2, &["cases"]);
        let search = CacheConfig::new(60_000, 0, &["search"]);

        store.set("s1", &json!("s"), &search);
        store.set("c1", &json!(1), &cases);
        store.set("c2", &json!(2), &cases);
        store.set("c3", &json!(3), &cases);

        assert!(store.contains("s1"), "Other namespaces are untouched");
        assert!(!store.contains("c1"));
        assert!(store.contains("c2"));
        assert!(store.contains("c3"));
    }

    #[test]
    fn test_store_namespace_cap_untagged_caps_whole_store() {
        let (mut store, _) = store_with_clock(MB, 100);
        let cfg = CacheConfig::new(60_000, 2, &[]);

        store.set("a", &json!(1), &cfg);
        store.set("b", &json!(2), &cfg);
        store.set("c", &json!(3), &cfg);

        assert_eq!(store.len(), 2);
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_store_stats_do_not_touch_entries() {
        let (mut store, clock) = store_with_clock(MB, 100);
        store.set("a", &json!("aa"), &config(5000, &[]));
        clock.advance(100);
        store.set("b", &json!("bbbb"), &config(5000, &[]));
        store.get("a");

        let before = store.peek("a").unwrap().clone();
        let stats = store.stats();
        let after = store.peek("a").unwrap();

        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.total_size_bytes, 4 + 6);
        assert_eq!(stats.average_size_bytes, 5.0);
        assert_eq!(stats.total_hits, 1);
        assert_eq!(stats.oldest_entry_timestamp, Some(1_000_000));
        assert_eq!(stats.newest_entry_timestamp, Some(1_000_100));
        assert_eq!(before.hit_count, after.hit_count);
        assert_eq!(before.last_accessed_at, after.last_accessed_at);
    }

    #[test]
    fn test_store_purge_expired() {
        let (mut store, clock) = store_with_clock(MB, 100);
        store.set("short", &json!(1), &config(1000, &["cases"]));
        store.set("long", &json!(2), &config(10_000, &["cases"]));

        clock.advance(2000);
        assert_eq!(store.purge_expired(), 1);

        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
        assert_eq!(store.delete_by_tags(&["cases"]), 1);
    }
}
