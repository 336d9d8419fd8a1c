//! Repository for the `wiki_revisions` table and the topic revision pointer.

use chrono::Utc;
use quire_core::error::CoreError;
use quire_core::object_kind::ObjectKind;
use quire_core::topic::TopicAggregate;
use quire_core::types::{ObjectId, Timestamp};
use sqlx::SqliteConnection;

use crate::error::RepoError;
use crate::models::wiki_revision::{CreateWikiRevision, WikiRevision};
use crate::repositories::{TopicRepo, UniqueIdRepo};
use crate::retry::with_retry;
use crate::DbPool;

/// Column list for wiki_revisions queries.
const COLUMNS: &str =
    "id, topic_id, editor_id, title, document, summary, parent_revision_id, created_at";

pub struct WikiRevisionRepo;

impl WikiRevisionRepo {
    /// Write a revision and make it the topic's current one.
    ///
    /// The parent is the pointer read inside this transaction, after the
    /// write lock is held, so it is always the revision being superseded.
    pub async fn create_and_make_current(
        pool: &DbPool,
        topic_id: &str,
        editor_id: &str,
        input: &CreateWikiRevision,
    ) -> Result<WikiRevision, RepoError> {
        with_retry(|| Self::create_once(pool, topic_id, editor_id, input)).await
    }

    async fn create_once(
        pool: &DbPool,
        topic_id: &str,
        editor_id: &str,
        input: &CreateWikiRevision,
    ) -> Result<WikiRevision, RepoError> {
        let mut tx = pool.begin().await?;
        let id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::WikiRevision).await?;

        let topic = TopicRepo::find_in(&mut *tx, topic_id)
            .await?
            .ok_or_else(|| CoreError::not_found("topic", topic_id))?;
        let mut pointer = TopicAggregate::new(topic.id, topic.current_wiki_revision_id);

        let now = Utc::now();
        let parent_revision_id = pointer.current_revision_id();
        let revision =
            Self::insert_in(&mut *tx, &id, topic_id, editor_id, input, parent_revision_id, now)
                .await?;
        pointer.apply_wiki_revision(&revision.id)?;
        TopicRepo::set_current_revision_in(&mut *tx, topic_id, pointer.current_revision_id(), now)
            .await?;

        tx.commit().await?;
        tracing::info!(
            revision_id = %revision.id,
            topic_id = %topic_id,
            parent_revision_id = ?revision.parent_revision_id,
            "Wiki revision created"
        );
        Ok(revision)
    }

    /// Insert a revision row. Does not touch the topic pointer.
    pub(crate) async fn insert_in(
        conn: &mut SqliteConnection,
        id: &str,
        topic_id: &str,
        editor_id: &str,
        input: &CreateWikiRevision,
        parent_revision_id: Option<&str>,
        now: Timestamp,
    ) -> Result<WikiRevision, sqlx::Error> {
        let query = format!(
            "INSERT INTO wiki_revisions
                (id, topic_id, editor_id, title, document, summary, parent_revision_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WikiRevision>(&query)
            .bind(id)
            .bind(topic_id)
            .bind(editor_id)
            .bind(&input.title)
            .bind(&input.document)
            .bind(&input.summary)
            .bind(parent_revision_id)
            .bind(now)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<WikiRevision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wiki_revisions WHERE id = ?1");
        sqlx::query_as::<_, WikiRevision>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub(crate) async fn find_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<WikiRevision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wiki_revisions WHERE id = ?1");
        sqlx::query_as::<_, WikiRevision>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Newest first.
    pub async fn list_by_topic(
        pool: &DbPool,
        topic_id: &str,
    ) -> Result<Vec<WikiRevision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wiki_revisions
             WHERE topic_id = ?1
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, WikiRevision>(&query)
            .bind(topic_id)
            .fetch_all(pool)
            .await
    }

    /// Walk the parent chain from `id` back to the first revision.
    pub async fn history(pool: &DbPool, id: &str) -> Result<Vec<ObjectId>, sqlx::Error> {
        sqlx::query_scalar(
            "WITH RECURSIVE chain(id, parent_revision_id) AS (
                 SELECT id, parent_revision_id FROM wiki_revisions WHERE id = ?1
                 UNION ALL
                 SELECT w.id, w.parent_revision_id
                 FROM wiki_revisions w JOIN chain c ON w.id = c.parent_revision_id
             )
             SELECT id FROM chain",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
