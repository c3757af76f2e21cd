//! Request and Response models for the API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! catalogue record type.

pub mod records;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use records::{Record, RecordKind};
pub use requests::{DeleteEntryQuery, InvalidateRequest, ListQuery, UpsertRecordRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, InvalidateResponse, MessageResponse,
    RecordListResponse, ReportSummary,
};
