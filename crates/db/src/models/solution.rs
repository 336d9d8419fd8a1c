//! Accepted-solution models and DTOs.

use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `topic_solutions` table; at most one per topic.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopicSolution {
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub post_id: ObjectId,
    pub set_by_user_id: ObjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for marking a post as the topic's solution.
#[derive(Debug, Deserialize)]
pub struct SetTopicSolution {
    pub post_id: ObjectId,
}
