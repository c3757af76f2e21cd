//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.
//! Per-route caching policy lives in [`crate::cache::CacheConfig`].

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_MAX_TOTAL_ENTRIES, DEFAULT_MAX_TOTAL_SIZE};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ceiling on the summed size of cached payloads, in bytes
    pub max_cache_size_bytes: usize,
    /// Ceiling on the number of cached entries
    pub max_cache_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE_BYTES` - Cache size ceiling (default: 100 MB)
    /// - `CACHE_MAX_ENTRIES` - Cache entry ceiling (default: 10000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_cache_size_bytes: env_or("CACHE_MAX_SIZE_BYTES", defaults.max_cache_size_bytes),
            max_cache_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_cache_entries),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_size_bytes: DEFAULT_MAX_TOTAL_SIZE,
            max_cache_entries: DEFAULT_MAX_TOTAL_ENTRIES,
            server_port: 3000,
            cleanup_interval: 600,
        }
    }
}

/// Parses `name` from the environment, falling back on absence or bad input.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
