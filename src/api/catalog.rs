//! Catalogue Handlers
//!
//! Read and write endpoints for legislation, articles, case law, search and
//! reports. Reads are cached by the routes; writes invalidate the affected
//! cache tags after storing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::models::{
    ListQuery, Record, RecordKind, RecordListResponse, ReportSummary, UpsertRecordRequest,
};

/// Handler for GET /api/{kind}
pub async fn list_records(
    kind: RecordKind,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<RecordListResponse> {
    let (data, total) = state.records.list(kind, &query).await;
    Json(RecordListResponse { data, total })
}

/// Handler for GET /api/{kind}/:id
pub async fn get_record(
    kind: RecordKind,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    state
        .records
        .get(kind, &id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("{:?} '{}'", kind, id)))
}

/// Handler for PUT /api/{kind}/:id
///
/// Stores the record, then drops every cached response that may embed it.
pub async fn upsert_record(
    kind: RecordKind,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpsertRecordRequest>,
) -> Result<Json<Record>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let record = state.records.upsert(kind, &id, req).await;

    let removed = match kind {
        RecordKind::Legislation => state.cache.invalidate_legislation(Some(&id)).await,
        RecordKind::Article => state.cache.invalidate_article(Some(&id)).await,
        RecordKind::Case => state.cache.invalidate_case(Some(&id)).await,
    };
    info!(?kind, id = %id, removed, "Record updated");

    Ok(Json(record))
}

/// Handler for GET /api/search?q=
pub async fn search_records(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<RecordListResponse>> {
    let needle = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("Query parameter 'q' is required".to_string()))?;

    let (data, total) = state.records.search(needle, query.limit).await;
    Ok(Json(RecordListResponse { data, total }))
}

/// Handler for GET /api/reports
pub async fn report_summary(State(state): State<AppState>) -> Json<ReportSummary> {
    Json(ReportSummary {
        generated_at: Utc::now(),
        legislation: state.records.count(RecordKind::Legislation).await,
        articles: state.records.count(RecordKind::Article).await,
        cases: state.records.count(RecordKind::Case).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordRepository;
    use crate::cache::{CacheConfig, CacheStore, DEFAULT_MAX_TOTAL_SIZE};
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(
            CacheStore::new(DEFAULT_MAX_TOTAL_SIZE, 100),
            RecordRepository::with_sample_data(),
        )
    }

    #[tokio::test]
    async fn test_get_record_not_found() {
        let result = get_record(
            RecordKind::Case,
            State(test_state()),
            Path("C-0/00".to_string()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_record_invalidates_related_tags() {
        let state = test_state();
        state.cache.set("leg", &json!(1), &CacheConfig::legislation()).await;
        state.cache.set("case", &json!(2), &CacheConfig::cases()).await;
        state.cache.set("srch", &json!(3), &CacheConfig::search()).await;

        let req = UpsertRecordRequest {
            title: "Updated case".to_string(),
            summary: None,
        };
        let record = upsert_record(
            RecordKind::Case,
            State(state.clone()),
            Path("C-131/12".to_string()),
            Json(req),
        )
        .await
        .unwrap();

        assert_eq!(record.title, "Updated case");
        assert_eq!(state.cache.stats().await.entry_count, 1);
        assert!(state.cache.get("leg").await.is_some());
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let result = search_records(State(test_state()), Query(ListQuery::default())).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_report_summary_counts() {
        let response = report_summary(State(test_state())).await;
        assert_eq!(response.legislation, 2);
        assert_eq!(response.cases, 2);
    }
}
