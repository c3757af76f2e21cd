//! Request DTOs for the API
//!
//! Defines the structure of incoming request bodies and query strings.

use serde::Deserialize;

/// Request body for POST /api/cache/invalidate
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Entries carrying any of these tags are removed
    pub tags: Vec<String>,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tags.is_empty() {
            return Some("At least one tag is required".to_string());
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Some("Tags cannot be empty".to_string());
        }
        None
    }
}

/// Query string for DELETE /api/cache/entry
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEntryQuery {
    pub key: String,
}

/// Query string for list and search routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive text filter
    #[serde(default)]
    pub q: Option<String>,
    /// Maximum number of records returned
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Request body for PUT /api/{kind}/:id
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRecordRequest {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
}

impl UpsertRecordRequest {
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Title cannot be empty".to_string());
        }
        None
    }
}
