//! Cache Manager Module
//!
//! Shared, lock-guarded handle to the process-wide cache store, plus the
//! invalidation policies the catalogue write paths call.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheConfig, CacheStats, CacheStore};

// == Cache Manager ==
/// Cloneable handle to one `CacheStore`.
///
/// Every operation that can touch entry metadata, `get` included, runs under
/// the write lock.
#[derive(Debug, Clone)]
pub struct CacheManager {
    store: Arc<RwLock<CacheStore>>,
    /// Copied from the store; fixed for its lifetime
    max_total_size: usize,
}

impl CacheManager {
    // == Constructor ==
    pub fn new(store: CacheStore) -> Self {
        Self {
            max_total_size: store.max_total_size_bytes(),
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Largest payload the store can ever hold. Read without locking.
    pub fn max_total_size_bytes(&self) -> usize {
        self.max_total_size
    }

    // == Store Operations ==
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.write().await.get(key)
    }

    /// Stores `payload`; returns whether anything was written.
    pub async fn set<T>(&self, key: &str, payload: &T, config: &CacheConfig) -> bool
    where
        T: Serialize + ?Sized,
    {
        self.store.write().await.set(key, payload, config)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn delete_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> usize {
        let removed = self.store.write().await.delete_by_tags(tags);
        if removed > 0 {
            let tags: Vec<&str> = tags.iter().map(|t| t.as_ref()).collect();
            info!(removed, ?tags, "Invalidated cache entries by tag");
        }
        removed
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
        info!("Cache cleared");
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    // == Invalidation Policies ==
    /// Drops cached legislation plus the articles and searches derived from it.
    pub async fn invalidate_legislation(&self, legislation_id: Option<&str>) -> usize {
        self.delete_by_tags(&related_tags(
            &["legislation", "articles", "search"],
            "legislation",
            legislation_id,
        ))
        .await
    }

    /// Drops cached articles plus the cases and searches citing them.
    pub async fn invalidate_article(&self, article_id: Option<&str>) -> usize {
        self.delete_by_tags(&related_tags(
            &["articles", "cases", "search"],
            "article",
            article_id,
        ))
        .await
    }

    pub async fn invalidate_case(&self, case_id: Option<&str>) -> usize {
        self.delete_by_tags(&related_tags(&["cases", "articles", "search"], "case", case_id))
            .await
    }
}

/// Builds the tag list for an invalidation, adding `<kind>:<id>` when known.
fn related_tags(base: &[&str], kind: &str, id: Option<&str>) -> Vec<String> {
    let mut tags: Vec<String> = base.iter().map(|t| t.to_string()).collect();
    if let Some(id) = id {
        tags.push(format!("{kind}:{id}"));
    }
    tags
}
