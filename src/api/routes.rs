//! API Routes
//!
//! Configures the Axum router with the catalogue and cache endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::catalog::{
    get_record, list_records, report_summary, search_records, upsert_record,
};
use super::handlers::{
    clear_handler, delete_entry_handler, health_handler, invalidate_handler, stats_handler,
    AppState,
};
use crate::cache::{CacheConfig, CacheManager};
use crate::middleware::with_cache;
use crate::models::{ListQuery, RecordKind, UpsertRecordRequest};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/{legislations,articles,cases}` - List records (cached)
/// - `GET /api/{legislations,articles,cases}/:id` - Single record (cached)
/// - `PUT /api/{legislations,articles,cases}/:id` - Upsert and invalidate
/// - `GET /api/search?q=` - Search all records (cached)
/// - `GET /api/reports` - Catalogue report (never cached)
/// - `GET /api/cache/stats` - Cache statistics
/// - `POST /api/cache/invalidate` - Invalidate by tags
/// - `DELETE /api/cache/entry?key=` - Delete a single cache key
/// - `DELETE /api/cache` - Clear the cache
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache = state.cache.clone();
    let router = RecordKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(record_routes(kind, &cache)));

    router
        .route(
            "/api/search",
            with_cache(get(search_records), &cache, CacheConfig::search(), Some("search")),
        )
        .route(
            "/api/reports",
            with_cache(get(report_summary), &cache, CacheConfig::reports(), Some("reports")),
        )
        .route("/api/cache", delete(clear_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/invalidate", post(invalidate_handler))
        .route("/api/cache/entry", delete(delete_entry_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// List, read and upsert routes for one record kind.
///
/// Reads are cached under the kind's policy; the upsert is added after the
/// cache layer so it is never wrapped.
fn record_routes(kind: RecordKind, cache: &CacheManager) -> Router<AppState> {
    let base = kind.route_base();
    let config = kind.cache_config();
    let prefix = Some(kind.cache_prefix());

    let list = get(move |state: State<AppState>, query: Query<ListQuery>| {
        list_records(kind, state, query)
    });
    let read = get(move |state: State<AppState>, id: Path<String>| get_record(kind, state, id));
    let write = move |state: State<AppState>,
                      id: Path<String>,
                      body: Json<UpsertRecordRequest>| {
        upsert_record(kind, state, id, body)
    };

    Router::new()
        .route(base, with_cache(list, cache, config.clone(), prefix))
        .route(
            &format!("{base}/:id"),
            with_cache(read, cache, config, prefix).put(write),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordRepository;
    use crate::cache::{CacheStore, DEFAULT_MAX_TOTAL_SIZE};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let cache = CacheStore::new(DEFAULT_MAX_TOTAL_SIZE, 100);
        let state = AppState::new(cache, RecordRepository::with_sample_data());
        create_router(state)
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_status(create_test_app(), "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(
            get_status(create_test_app(), "/api/cache/stats").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_record_routes_for_every_kind() {
        let app = create_test_app();
        for kind in RecordKind::ALL {
            assert_eq!(
                get_status(app.clone(), kind.route_base()).await,
                StatusCode::OK
            );
        }
    }

    #[tokio::test]
    async fn test_record_with_slash_in_id() {
        assert_eq!(
            get_status(create_test_app(), "/api/cases/C-131%2F12").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_record_not_found() {
        assert_eq!(
            get_status(create_test_app(), "/api/legislations/nonexistent").await,
            StatusCode::NOT_FOUND
        );
    }
}
