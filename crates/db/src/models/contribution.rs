//! Contribution credit models.

use quire_core::types::{ObjectId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contribution_credits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContributionCredit {
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub revision_id: ObjectId,
    pub user_id: ObjectId,
    pub weight: i64,
    pub created_at: Timestamp,
}

/// Summed credit for one user on one topic.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ContributorStat {
    pub user_id: ObjectId,
    pub total_weight: i64,
}
