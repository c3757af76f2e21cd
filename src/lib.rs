//! Lexx Cache - response caching for the Lexx legal research API
//!
//! Provides an in-process response cache with TTL expiration, size-bounded
//! LRU eviction and tag-based invalidation, plus the axum middleware that
//! serves cached responses.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, CacheManager, CacheStore};
pub use config::Config;
pub use middleware::with_cache;
pub use tasks::spawn_cleanup_task;
