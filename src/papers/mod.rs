//! Papers: past exam paper repository
//!
//! Handles filter-query construction, upload candidates and metadata
//! validation, and the HTTP client for the remote paper repository.

pub mod client;
pub mod error;
pub mod query;
pub mod schema;
pub mod upload;

pub use client::{HttpPaperClient, PaperRepository};
pub use error::{SearchError, UploadError};
pub use query::build_query;
pub use schema::{Branch, ExamType, FilterCriteria, MetadataForm, PaperMetadata, PaperRecord};
pub use upload::{UploadCandidate, MAX_UPLOAD_BYTES};
