//! Shared query parameter types for API handlers.

use quire_core::error::CoreError;
use quire_core::pagination::PageRequest;
use quire_core::types::ObjectId;
use serde::Deserialize;

/// Generic pagination parameters (`?page=&page_size=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Apply defaults (absent or `0` means unset) and reject out-of-range
    /// values.
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.page_size)
    }
}

/// Query parameters for `GET /doc-graph`.
#[derive(Debug, Deserialize)]
pub struct DocGraphParams {
    pub root_topic_id: ObjectId,
    /// Clamped to 1..=5; absent or non-positive means 2.
    pub depth: Option<i32>,
}
