//! Topic models and DTOs.

use quire_core::topic::{TopicKind, TopicStatus};
use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `topics` table.
///
/// `post_count` and `vote_count` are caches maintained by the post and vote
/// repositories inside the same transaction as the rows they count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: ObjectId,
    pub board_id: ObjectId,
    pub user_id: ObjectId,
    pub title: String,
    pub topic_kind: String,
    pub is_wiki_enabled: bool,
    pub current_wiki_revision_id: Option<ObjectId>,
    pub solved_post_id: Option<ObjectId>,
    pub status: String,
    pub post_count: i64,
    pub vote_count: i64,
    pub last_post_id: Option<ObjectId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Topic {
    pub fn is_closed(&self) -> bool {
        self.status == TopicStatus::Closed.as_str()
    }
}

/// DTO for creating a topic.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopic {
    pub board_id: ObjectId,
    #[validate(length(min = 2, max = 180))]
    pub title: String,
    /// Defaults to `discussion`.
    pub topic_kind: Option<TopicKind>,
    #[serde(default)]
    pub is_wiki_enabled: bool,
}

/// DTO for opening or closing a topic.
#[derive(Debug, Deserialize)]
pub struct UpdateTopicStatus {
    pub status: TopicStatus,
}
