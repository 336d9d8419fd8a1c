//! Repository for the `posts` table.

use chrono::Utc;
use quire_core::object_kind::ObjectKind;
use quire_core::pagination::PageRequest;
use quire_core::topic::PostMergeState;
use quire_core::types::ObjectId;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::post::{CreatePost, Post};
use crate::repositories::UniqueIdRepo;
use crate::retry::with_retry;
use crate::DbPool;

/// Column list for posts queries.
const COLUMNS: &str = "id, topic_id, user_id, original_text, parsed_text, merge_state, \
    archived_at, vote_count, status, created_at, updated_at";

pub struct PostRepo;

impl PostRepo {
    /// Insert a reply and bump the topic's `post_count` / `last_post_id` in
    /// the same transaction.
    pub async fn create(
        pool: &DbPool,
        topic_id: &str,
        user_id: &str,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        with_retry(|| Self::create_once(pool, topic_id, user_id, input)).await
    }

    async fn create_once(
        pool: &DbPool,
        topic_id: &str,
        user_id: &str,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::Post).await?;
        let now = Utc::now();

        // Rendering is out of scope; the parsed copy is the original text.
        let query = format!(
            "INSERT INTO posts
                (id, topic_id, user_id, original_text, parsed_text, merge_state,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?6)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(&id)
            .bind(topic_id)
            .bind(user_id)
            .bind(&input.original_text)
            .bind(PostMergeState::Active.as_str())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE topics
             SET post_count = post_count + 1, last_post_id = ?1, updated_at = ?2
             WHERE id = ?3",
        )
        .bind(&post.id)
        .bind(now)
        .bind(topic_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = ?1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The subset of `ids` that exist and belong to `topic_id`.
    pub async fn find_in_topic(
        pool: &DbPool,
        topic_id: &str,
        ids: &[ObjectId],
    ) -> Result<Vec<Post>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM posts WHERE topic_id = "));
        builder.push_bind(topic_id);
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY id ASC");
        builder.build_query_as::<Post>().fetch_all(pool).await
    }

    /// Oldest first, archived posts included.
    pub async fn list_by_topic(
        pool: &DbPool,
        topic_id: &str,
        page: PageRequest,
    ) -> Result<(Vec<Post>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE topic_id = ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(topic_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE topic_id = ?1")
            .bind(topic_id)
            .fetch_one(pool)
            .await?;
        Ok((posts, total))
    }
}
