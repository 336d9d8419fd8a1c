//! Post models and DTOs.

use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub user_id: ObjectId,
    pub original_text: String,
    pub parsed_text: String,
    pub merge_state: String,
    pub archived_at: Option<Timestamp>,
    pub vote_count: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for replying to a topic.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 2, max = 20000))]
    pub original_text: String,
}
