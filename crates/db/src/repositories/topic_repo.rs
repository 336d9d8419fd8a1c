//! Repository for the `topics` table.
//!
//! `post_count`, `vote_count`, `solved_post_id` and the revision pointer are
//! written by the post, vote, solution and wiki repositories inside their
//! own transactions; this repository only reads them.

use chrono::Utc;
use quire_core::object_kind::ObjectKind;
use quire_core::pagination::PageRequest;
use quire_core::topic::{TopicKind, TopicStatus};
use quire_core::types::Timestamp;
use sqlx::SqliteConnection;

use crate::models::topic::{CreateTopic, Topic};
use crate::repositories::UniqueIdRepo;
use crate::DbPool;

/// Column list for topics queries.
pub(crate) const COLUMNS: &str = "id, board_id, user_id, title, topic_kind, is_wiki_enabled, \
    current_wiki_revision_id, solved_post_id, status, post_count, vote_count, last_post_id, \
    created_at, updated_at";

pub struct TopicRepo;

impl TopicRepo {
    pub async fn create(
        pool: &DbPool,
        user_id: &str,
        input: &CreateTopic,
    ) -> Result<Topic, sqlx::Error> {
        let id = UniqueIdRepo::generate(pool, ObjectKind::Topic).await?;
        let now = Utc::now();
        let kind = input.topic_kind.unwrap_or(TopicKind::Discussion);
        let query = format!(
            "INSERT INTO topics
                (id, board_id, user_id, title, topic_kind, is_wiki_enabled, status,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(&id)
            .bind(&input.board_id)
            .bind(user_id)
            .bind(&input.title)
            .bind(kind.as_str())
            .bind(input.is_wiki_enabled)
            .bind(TopicStatus::Available.as_str())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = ?1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Same as [`find_by_id`](Self::find_by_id), on a transaction's connection.
    pub async fn find_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = ?1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Newest first.
    pub async fn list_by_board(
        pool: &DbPool,
        board_id: &str,
        page: PageRequest,
    ) -> Result<(Vec<Topic>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics
             WHERE board_id = ?1
             ORDER BY id DESC
             LIMIT ?2 OFFSET ?3"
        );
        let topics = sqlx::query_as::<_, Topic>(&query)
            .bind(board_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM topics WHERE board_id = ?1")
            .bind(board_id)
            .fetch_one(pool)
            .await?;
        Ok((topics, total))
    }

    /// Returns the updated row, or `None` if the topic does not exist.
    pub async fn set_status(
        pool: &DbPool,
        id: &str,
        status: TopicStatus,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!(
            "UPDATE topics SET status = ?1, updated_at = ?2
             WHERE id = ?3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Point the topic at a new current revision.
    pub(crate) async fn set_current_revision_in(
        conn: &mut SqliteConnection,
        id: &str,
        revision_id: Option<&str>,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE topics SET current_wiki_revision_id = ?1, updated_at = ?2
             WHERE id = ?3",
        )
        .bind(revision_id)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }
}
