//! Record Repository
//!
//! In-memory catalogue standing in for the hosted database behind the
//! cached routes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{ListQuery, Record, RecordKind, UpsertRecordRequest};

/// Default page size when a query gives no `limit`
pub const DEFAULT_LIMIT: usize = 50;

// == Record Repository ==
/// Thread-safe record store keyed by kind, then id.
#[derive(Debug, Clone, Default)]
pub struct RecordRepository {
    records: Arc<RwLock<HashMap<RecordKind, BTreeMap<String, Record>>>>,
}

impl RecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with a handful of well-known EU instruments and cases.
    pub fn with_sample_data() -> Self {
        let seed = [
            Record::new(
                RecordKind::Legislation,
                "32016R0679",
                "General Data Protection Regulation",
            )
            .with_summary("Protection of natural persons with regard to the processing of personal data"),
            Record::new(RecordKind::Legislation, "32022R2065", "Digital Services Act")
                .with_summary("Single market for digital services"),
            Record::new(RecordKind::Article, "32016R0679-art17", "Right to erasure")
                .with_summary("Article 17 GDPR"),
            Record::new(RecordKind::Article, "32016R0679-art6", "Lawfulness of processing")
                .with_summary("Article 6 GDPR"),
            Record::new(RecordKind::Case, "C-131/12", "Google Spain v AEPD")
                .with_summary("Right to be forgotten and search engines"),
            Record::new(RecordKind::Case, "C-311/18", "Data Protection Commissioner v Facebook Ireland")
                .with_summary("Schrems II, transfers of personal data to third countries"),
        ];

        let mut records: HashMap<RecordKind, BTreeMap<String, Record>> = HashMap::new();
        for record in seed {
            records
                .entry(record.kind)
                .or_default()
                .insert(record.id.clone(), record);
        }

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Records of `kind` matching the query, ordered by id.
    ///
    /// Returns the page and the number of matches before the limit.
    pub async fn list(&self, kind: RecordKind, query: &ListQuery) -> (Vec<Record>, usize) {
        let records = self.records.read().await;
        let matches: Vec<&Record> = records
            .get(&kind)
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter(|r| query.q.as_deref().map_or(true, |q| r.matches(q)))
            .collect();

        paginate(matches, query.limit)
    }

    pub async fn get(&self, kind: RecordKind, id: &str) -> Option<Record> {
        self.records
            .read()
            .await
            .get(&kind)
            .and_then(|by_id| by_id.get(id))
            .cloned()
    }

    /// Inserts or replaces the record `id` of `kind`.
    pub async fn upsert(&self, kind: RecordKind, id: &str, req: UpsertRecordRequest) -> Record {
        let record = Record {
            id: id.to_string(),
            kind,
            title: req.title,
            summary: req.summary,
            updated_at: Utc::now(),
        };

        self.records
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(record.id.clone(), record.clone());
        record
    }

    /// Matches across every kind, ordered by kind then id.
    pub async fn search(&self, needle: &str, limit: Option<usize>) -> (Vec<Record>, usize) {
        let records = self.records.read().await;
        let matches: Vec<&Record> = RecordKind::ALL
            .iter()
            .filter_map(|kind| records.get(kind))
            .flat_map(BTreeMap::values)
            .filter(|r| r.matches(needle))
            .collect();

        paginate(matches, limit)
    }

    pub async fn count(&self, kind: RecordKind) -> usize {
        self.records.read().await.get(&kind).map_or(0, BTreeMap::len)
    }
}

fn paginate(matches: Vec<&Record>, limit: Option<usize>) -> (Vec<Record>, usize) {
    let total = matches.len();
    let page = matches
        .into_iter()
        .take(limit.unwrap_or(DEFAULT_LIMIT))
        .cloned()
        .collect();
    (page, total)
}
