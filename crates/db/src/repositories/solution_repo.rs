//! Repository for the `topic_solutions` table.

use chrono::Utc;
use quire_core::object_kind::ObjectKind;

use crate::models::solution::TopicSolution;
use crate::repositories::UniqueIdRepo;
use crate::retry::with_retry;
use crate::DbPool;

/// Column list for topic_solutions queries.
const COLUMNS: &str = "id, topic_id, post_id, set_by_user_id, created_at, updated_at";

pub struct SolutionRepo;

impl SolutionRepo {
    /// Set (or replace) the topic's accepted post and mirror it into
    /// `topics.solved_post_id` in the same transaction.
    pub async fn upsert(
        pool: &DbPool,
        topic_id: &str,
        post_id: &str,
        user_id: &str,
    ) -> Result<TopicSolution, sqlx::Error> {
        with_retry(|| Self::upsert_once(pool, topic_id, post_id, user_id)).await
    }

    async fn upsert_once(
        pool: &DbPool,
        topic_id: &str,
        post_id: &str,
        user_id: &str,
    ) -> Result<TopicSolution, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::TopicSolution).await?;
        let now = Utc::now();

        let query = format!(
            "INSERT INTO topic_solutions
                (id, topic_id, post_id, set_by_user_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (topic_id) DO UPDATE SET
                post_id = excluded.post_id,
                set_by_user_id = excluded.set_by_user_id,
                updated_at = excluded.updated_at
             RETURNING {COLUMNS}"
        );
        let solution = sqlx::query_as::<_, TopicSolution>(&query)
            .bind(&id)
            .bind(topic_id)
            .bind(post_id)
            .bind(user_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE topics SET solved_post_id = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(post_id)
            .bind(now)
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(solution)
    }

    pub async fn find_by_topic(
        pool: &DbPool,
        topic_id: &str,
    ) -> Result<Option<TopicSolution>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topic_solutions WHERE topic_id = ?1");
        sqlx::query_as::<_, TopicSolution>(&query)
            .bind(topic_id)
            .fetch_optional(pool)
            .await
    }
}
