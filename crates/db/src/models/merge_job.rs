//! Merge job models and DTOs.

use quire_core::error::CoreError;
use quire_core::merge_job::MergeJobAggregate;
use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::wiki_revision::{CreateWikiRevision, WikiRevision};

/// A row from the `merge_jobs` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MergeJob {
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub creator_id: ObjectId,
    pub reviewer_id: Option<ObjectId>,
    pub status: String,
    pub summary: String,
    pub applied_revision_id: Option<ObjectId>,
    pub applied_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MergeJob {
    /// Rebuild the state machine from this row.
    pub fn aggregate(&self) -> Result<MergeJobAggregate, CoreError> {
        MergeJobAggregate::from_parts(
            self.id.clone(),
            &self.status,
            self.reviewer_id.as_deref(),
            self.applied_revision_id.as_deref(),
        )
    }
}

/// A row from the `merge_job_post_refs` table. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MergeJobPostRef {
    pub id: ObjectId,
    pub merge_job_id: ObjectId,
    pub post_id: ObjectId,
    pub created_at: Timestamp,
}

/// A job together with the posts it names.
#[derive(Debug, Clone, Serialize)]
pub struct MergeJobDetail {
    pub job: MergeJob,
    pub post_refs: Vec<MergeJobPostRef>,
}

/// DTO for proposing a merge.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMergeJob {
    #[validate(length(min = 1))]
    pub post_ids: Vec<ObjectId>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub summary: String,
}

/// DTO for applying a merge: the revision to create plus the credit weight.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyMergeJob {
    #[validate(length(min = 2, max = 180))]
    pub title: String,
    #[validate(length(min = 2, max = 200000))]
    pub document: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub summary: String,
    /// Values <= 0 fall back to the default weight.
    #[serde(default)]
    pub contribution_weight: i64,
}

impl ApplyMergeJob {
    pub fn revision(&self) -> CreateWikiRevision {
        CreateWikiRevision {
            title: self.title.clone(),
            document: self.document.clone(),
            summary: self.summary.clone(),
        }
    }
}

/// Result of an apply call.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedMerge {
    pub job: MergeJob,
    pub revision: WikiRevision,
    /// `true` when the job had already been applied and nothing was written.
    pub replayed: bool,
}
