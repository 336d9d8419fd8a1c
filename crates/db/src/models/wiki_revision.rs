//! Wiki revision models and DTOs.

use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `wiki_revisions` table. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct WikiRevision {
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub editor_id: ObjectId,
    pub title: String,
    pub document: String,
    pub summary: String,
    pub parent_revision_id: Option<ObjectId>,
    pub created_at: Timestamp,
}

/// DTO for a directly authored wiki revision.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWikiRevision {
    #[validate(length(min = 2, max = 180))]
    pub title: String,
    #[validate(length(min = 2, max = 200000))]
    pub document: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub summary: String,
}
