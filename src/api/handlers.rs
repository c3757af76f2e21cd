//! API Handlers
//!
//! Application state plus the cache administration and health endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::api::RecordRepository;
use crate::cache::{CacheManager, CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    DeleteEntryQuery, DeleteResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    MessageResponse,
};

/// Application state shared across all handlers.
///
/// Holds the single cache instance for the process; cloning shares it.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: CacheManager,
    /// Catalogue backing the cached routes
    pub records: RecordRepository,
}

impl AppState {
    /// Creates a new AppState with the given cache store and catalogue.
    pub fn new(cache: CacheStore, records: RecordRepository) -> Self {
        Self {
            cache: CacheManager::new(cache),
            records,
        }
    }

    /// Creates a new AppState from configuration, seeded with sample records.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.max_cache_size_bytes, config.max_cache_entries);
        Self::new(cache, RecordRepository::with_sample_data())
    }
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Handler for POST /api/cache/invalidate
///
/// Removes every entry carrying any of the requested tags.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let removed = state.cache.delete_by_tags(&req.tags).await;
    Ok(Json(InvalidateResponse {
        removed,
        tags: req.tags,
    }))
}

/// Handler for DELETE /api/cache/entry?key=
pub async fn delete_entry_handler(
    State(state): State<AppState>,
    Query(query): Query<DeleteEntryQuery>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&query.key).await {
        return Err(ApiError::NotFound(format!("cache key '{}'", query.key)));
    }

    Ok(Json(DeleteResponse::new(query.key)))
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear().await;
    info!("Cache cleared via API");
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.stats().await))
}
