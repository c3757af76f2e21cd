//! Response Caching Middleware
//!
//! Wraps read-only routes so repeated requests are answered from the cache
//! store instead of re-running the handler.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{OriginalUri, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheManager};
use crate::error::ApiError;
use crate::middleware::derive_cache_key;

/// Header carrying `HIT` or `MISS`
pub const CACHE_STATUS_HEADER: &str = "x-cache";
/// Header carrying the key a response was cached under
pub const CACHE_KEY_HEADER: &str = "x-cache-key";

// == Cache Status ==
/// Whether a response was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

// == Cache Context ==
/// State handed to `cache_response` for one wrapped route.
#[derive(Debug, Clone)]
pub struct CacheContext {
    cache: CacheManager,
    config: Arc<CacheConfig>,
    prefix: Option<Arc<str>>,
}

impl CacheContext {
    pub fn new(cache: CacheManager, config: CacheConfig, prefix: Option<&str>) -> Self {
        Self {
            cache,
            config: Arc::new(config),
            prefix: prefix.map(Arc::from),
        }
    }
}

// == With Cache ==
/// Layers response caching over `route` using `config`.
///
/// A disabled config returns the route untouched, so it never reaches the
/// store. Layer the cache before adding write methods to the same router;
/// methods added afterwards are not wrapped.
///
/// # Example
/// ```ignore
/// let route = with_cache(get(list_cases), &cache, CacheConfig::cases(), Some("cases"));
/// ```
pub fn with_cache<S>(
    route: MethodRouter<S>,
    cache: &CacheManager,
    config: CacheConfig,
    prefix: Option<&str>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.is_enabled() {
        return route;
    }

    let context = CacheContext::new(cache.clone(), config, prefix);
    route.layer(from_fn_with_state(context, cache_response))
}

// == Middleware ==
/// Serves cached bodies on hit; on miss runs the handler and stores a
/// successful body whose content type is JSON.
///
/// Only `GET` requests are cached. Cache problems never change a handler's
/// outcome: at worst the response goes out uncached.
pub async fn cache_response(
    State(context): State<CacheContext>,
    request: Request,
    next: Next,
) -> Response {
    if !context.config.is_enabled() || request.method() != Method::GET {
        return next.run(request).await;
    }

    // Nested routers see a stripped path; key on the path the client sent
    let uri = match request.extensions().get::<OriginalUri>() {
        Some(OriginalUri(original)) => original.clone(),
        None => request.uri().clone(),
    };
    let key = derive_cache_key(request.method(), &uri, context.prefix.as_deref());

    if let Some(payload) = context.cache.get(&key).await {
        debug!(key, "Cache hit");
        let mut response = Json(payload).into_response();
        set_cache_status(&mut response, CacheStatus::Hit);
        describe_cached(&mut response, &key, &context.config);
        return response;
    }

    debug!(key, "Cache miss");
    let mut response = next.run(request).await;
    if !is_cacheable(&response, context.cache.max_total_size_bytes()) {
        set_cache_status(&mut response, CacheStatus::Miss);
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(key, error = %err, "Failed to read handler response body");
            return ApiError::Internal("Failed to read response body".to_string())
                .into_response();
        }
    };

    let stored = match serde_json::from_slice::<Value>(&bytes) {
        Ok(payload) => context.cache.set(&key, &payload, &context.config).await,
        Err(err) => {
            debug!(key, error = %err, "Response labelled JSON did not parse, not caching");
            false
        }
    };

    let mut response = Response::from_parts(parts, Body::from(bytes));
    set_cache_status(&mut response, CacheStatus::Miss);
    if stored {
        describe_cached(&mut response, &key, &context.config);
    }
    response
}

// == Cacheability ==
/// Only a `200 OK` JSON response that can fit in the store is buffered.
/// Everything else streams through untouched.
fn is_cacheable(response: &Response, max_size: usize) -> bool {
    response.status() == StatusCode::OK
        && is_json(response.headers())
        && response.body().size_hint().lower() <= max_size as u64
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

// == Header Helpers ==
fn set_cache_status(response: &mut Response, status: CacheStatus) {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status.as_str()));
}

/// Adds the cache key and `Cache-Control`. A key that is not a valid header
/// value (decoded non-ASCII query text) is left out.
fn describe_cached(response: &mut Response, key: &str, config: &CacheConfig) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(key) {
        headers.insert(CACHE_KEY_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", config.max_age_secs())) {
        headers.insert(header::CACHE_CONTROL, value);
    }
}
