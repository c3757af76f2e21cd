//! API Module
//!
//! HTTP handlers and routing for the catalogue and cache administration API.
//!
//! # Endpoints
//! - `GET /api/legislations`, `/api/articles`, `/api/cases` (+ `/:id`) - Cached reads
//! - `PUT /api/{kind}/:id` - Upsert a record and invalidate related cache tags
//! - `GET /api/search?q=` - Cached search across all records
//! - `GET /api/reports` - Uncached report summary
//! - `/api/cache/*` - Cache statistics, invalidation and clearing
//! - `GET /health` - Health check endpoint

pub mod catalog;
pub mod handlers;
pub mod repository;
pub mod routes;

pub use handlers::*;
pub use repository::RecordRepository;
pub use routes::create_router;
