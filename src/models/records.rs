//! Catalogue records
//!
//! Legislation, articles and case law as served by the catalogue routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;

/// Kind of catalogue record. Each kind has its own routes and cache policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Legislation,
    Article,
    Case,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Legislation, RecordKind::Article, RecordKind::Case];

    /// Base path of the kind's routes.
    pub fn route_base(&self) -> &'static str {
        match self {
            RecordKind::Legislation => "/api/legislations",
            RecordKind::Article => "/api/articles",
            RecordKind::Case => "/api/cases",
        }
    }

    /// Namespace prefix for cache keys.
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            RecordKind::Legislation => "legislation",
            RecordKind::Article => "articles",
            RecordKind::Case => "cases",
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        match self {
            RecordKind::Legislation => CacheConfig::legislation(),
            RecordKind::Article => CacheConfig::articles(),
            RecordKind::Case => CacheConfig::cases(),
        }
    }
}

/// A single catalogue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn new(kind: RecordKind, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            summary: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Case-insensitive match of `needle` against title and summary.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .summary
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}
