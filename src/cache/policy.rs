//! Cache Policy Module
//!
//! Per-route caching policy: how long entries live, how many a route may keep,
//! and which tags they carry for invalidation.

use serde::Deserialize;

const MINUTE_MS: u64 = 60 * 1000;

// == Cache Config ==
/// Caching policy attached to a wrapped route.
///
/// Unknown fields are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Milliseconds until an entry expires; 0 disables caching
    pub duration_ms: u64,
    /// Soft cap on entries in this route's namespace; 0 means no cap
    #[serde(default)]
    pub max_entries: usize,
    /// Tags attached to every entry written under this policy
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CacheConfig {
    // == Constructor ==
    pub fn new(duration_ms: u64, max_entries: usize, tags: &[&str]) -> Self {
        Self {
            duration_ms,
            max_entries,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Policy that never caches.
    pub fn disabled() -> Self {
        Self::new(0, 0, &[])
    }

    // == Presets ==
    /// Legislation changes rarely: one hour.
    pub fn legislation() -> Self {
        Self::new(60 * MINUTE_MS, 1000, &["legislation"])
    }

    pub fn articles() -> Self {
        Self::new(30 * MINUTE_MS, 2000, &["articles"])
    }

    pub fn cases() -> Self {
        Self::new(15 * MINUTE_MS, 1000, &["cases"])
    }

    pub fn search() -> Self {
        Self::new(5 * MINUTE_MS, 500, &["search"])
    }

    /// Reports are personalized and never cached.
    pub fn reports() -> Self {
        Self::new(0, 0, &["reports"])
    }

    // == Queries ==
    /// Returns true if this policy stores anything at all.
    pub fn is_enabled(&self) -> bool {
        self.duration_ms > 0
    }

    /// Tag that identifies this policy's namespace for the entry soft cap.
    pub fn namespace_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// `max-age` value in whole seconds for `Cache-Control`.
    pub fn max_age_secs(&self) -> u64 {
        self.duration_ms / 1000
    }
}
