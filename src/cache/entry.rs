//! Cache Entry Module
//!
//! Defines a single cached response with its expiry, size and access metadata.

use serde_json::Value;

use crate::cache::CacheConfig;

// == Cache Entry ==
/// Represents a single cached response payload and its metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cache key the entry is stored under
    pub key: String,
    /// The cached response body
    pub payload: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Length of the serialized payload
    pub size_bytes: usize,
    /// Tags used for bulk invalidation
    pub tags: Vec<String>,
    /// Number of successful reads
    pub hit_count: u64,
    /// Last read or write (Unix milliseconds)
    pub last_accessed_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry written at `now` under `config`.
    pub fn new(
        key: String,
        payload: Value,
        size_bytes: usize,
        config: &CacheConfig,
        now: u64,
    ) -> Self {
        Self {
            key,
            payload,
            created_at: now,
            expires_at: now.saturating_add(config.duration_ms),
            size_bytes,
            tags: config.tags.clone(),
            hit_count: 0,
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// An entry stays live up to and including `expires_at`.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Record Hit ==
    pub fn record_hit(&mut self, now: u64) {
        self.hit_count += 1;
        self.last_accessed_at = now;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_at(now: u64) -> CacheEntry {
        let config = CacheConfig::new(5000, 10, &["cases", "search"]);
        CacheEntry::new("GET:/api/cases".to_string(), json!([1, 2]), 5, &config, now)
    }

    #[test]
    fn test_entry_creation() {
        let entry = entry_at(1_000);

        assert_eq!(entry.created_at, 1_000);
        assert_eq!(entry.expires_at, 6_000);
        assert_eq!(entry.last_accessed_at, 1_000);
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.tags, vec!["cases", "search"]);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = entry_at(1_000);

        assert!(!entry.is_expired(1_000));
        assert!(!entry.is_expired(6_000), "Entry is still live at expires_at");
        assert!(entry.is_expired(6_001));
    }

    #[test]
    fn test_record_hit() {
        let mut entry = entry_at(1_000);
        entry.record_hit(1_500);
        entry.record_hit(2_000);

        assert_eq!(entry.hit_count, 2);
        assert_eq!(entry.last_accessed_at, 2_000);
        assert_eq!(entry.created_at, 1_000);
    }
}
