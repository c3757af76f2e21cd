//! Middleware Module
//!
//! Response caching for read-only routes.
//!
//! # Cache headers
//! - `x-cache` - `HIT` or `MISS` on every response passing through
//! - `x-cache-key` - key the body is cached under
//! - `cache-control` - `public, max-age=<route duration>` on cached bodies

mod key;
mod layer;

pub use key::derive_cache_key;
pub use layer::{
    cache_response, with_cache, CacheContext, CacheStatus, CACHE_KEY_HEADER, CACHE_STATUS_HEADER,
};
