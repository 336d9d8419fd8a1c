//! Repository for `merge_jobs` / `merge_job_post_refs`, including the
//! transactional apply that folds posts into a wiki revision.

use chrono::Utc;
use quire_core::contribution::distribute_credits;
use quire_core::error::CoreError;
use quire_core::merge_job::MergeJobStatus;
use quire_core::object_kind::ObjectKind;
use quire_core::topic::{PostMergeState, TopicAggregate};
use quire_core::types::{ObjectId, Timestamp};
use sqlx::SqliteConnection;

use crate::error::RepoError;
use crate::models::merge_job::{
    AppliedMerge, ApplyMergeJob, CreateMergeJob, MergeJob, MergeJobDetail, MergeJobPostRef,
};
use crate::repositories::{TopicRepo, UniqueIdRepo, WikiRevisionRepo};
use crate::retry::with_retry;
use crate::DbPool;

/// Column list for merge_jobs queries.
const COLUMNS: &str = "id, topic_id, creator_id, reviewer_id, status, summary, \
    applied_revision_id, applied_at, created_at, updated_at";

/// Column list for merge_job_post_refs queries.
const REF_COLUMNS: &str = "id, merge_job_id, post_id, created_at";

pub struct MergeJobRepo;

impl MergeJobRepo {
    // -----------------------------------------------------------------------
    // Create / read
    // -----------------------------------------------------------------------

    /// Insert a pending job and its post refs atomically.
    ///
    /// Callers check beforehand that every post exists in the topic.
    pub async fn create(
        pool: &DbPool,
        topic_id: &str,
        creator_id: &str,
        input: &CreateMergeJob,
    ) -> Result<MergeJobDetail, sqlx::Error> {
        with_retry(|| Self::create_once(pool, topic_id, creator_id, input)).await
    }

    async fn create_once(
        pool: &DbPool,
        topic_id: &str,
        creator_id: &str,
        input: &CreateMergeJob,
    ) -> Result<MergeJobDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::MergeJob).await?;
        let now = Utc::now();

        let query = format!(
            "INSERT INTO merge_jobs
                (id, topic_id, creator_id, status, summary, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, MergeJob>(&query)
            .bind(&id)
            .bind(topic_id)
            .bind(creator_id)
            .bind(MergeJobStatus::Pending.as_str())
            .bind(&input.summary)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let ref_query = format!(
            "INSERT INTO merge_job_post_refs (id, merge_job_id, post_id, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {REF_COLUMNS}"
        );
        let mut post_refs = Vec::with_capacity(input.post_ids.len());
        for post_id in &input.post_ids {
            let ref_id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::MergeJobPostRef).await?;
            let post_ref = sqlx::query_as::<_, MergeJobPostRef>(&ref_query)
                .bind(&ref_id)
                .bind(&job.id)
                .bind(post_id)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
            post_refs.push(post_ref);
        }

        tx.commit().await?;
        Ok(MergeJobDetail { job, post_refs })
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<MergeJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merge_jobs WHERE id = ?1");
        sqlx::query_as::<_, MergeJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn find_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<MergeJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM merge_jobs WHERE id = ?1");
        sqlx::query_as::<_, MergeJob>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// The posts a job names, in the order they were proposed.
    pub async fn list_post_refs(
        pool: &DbPool,
        merge_job_id: &str,
    ) -> Result<Vec<MergeJobPostRef>, sqlx::Error> {
        let query = format!(
            "SELECT {REF_COLUMNS} FROM merge_job_post_refs
             WHERE merge_job_id = ?1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, MergeJobPostRef>(&query)
            .bind(merge_job_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// `pending -> reviewed`.
    pub async fn mark_reviewed(
        pool: &DbPool,
        topic_id: &str,
        job_id: &str,
        reviewer_id: &str,
    ) -> Result<MergeJob, RepoError> {
        with_retry(|| Self::mark_reviewed_once(pool, topic_id, job_id, reviewer_id)).await
    }

    async fn mark_reviewed_once(
        pool: &DbPool,
        topic_id: &str,
        job_id: &str,
        reviewer_id: &str,
    ) -> Result<MergeJob, RepoError> {
        let mut tx = pool.begin().await?;
        let job = Self::find_in_topic(&mut *tx, topic_id, job_id).await?;
        let mut aggregate = job.aggregate()?;
        aggregate.mark_reviewed(reviewer_id)?;

        let updated = Self::persist_state(
            &mut *tx,
            &job,
            aggregate.status(),
            aggregate.reviewer_id(),
            None,
            None,
            Utc::now(),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(merge_job_id = %job_id, reviewer_id = %reviewer_id, "Merge job reviewed");
        Ok(updated)
    }

    /// Apply a job: write a revision from `input`, move the topic pointer to
    /// it, archive the named posts, credit their authors and mark the job
    /// applied, all in one transaction.
    ///
    /// A job that is already applied is returned with its recorded revision
    /// and nothing is written, so a retried request is harmless.
    pub async fn apply(
        pool: &DbPool,
        topic_id: &str,
        job_id: &str,
        applier_id: &str,
        input: &ApplyMergeJob,
    ) -> Result<AppliedMerge, RepoError> {
        with_retry(|| Self::apply_once(pool, topic_id, job_id, applier_id, input)).await
    }

    async fn apply_once(
        pool: &DbPool,
        topic_id: &str,
        job_id: &str,
        applier_id: &str,
        input: &ApplyMergeJob,
    ) -> Result<AppliedMerge, RepoError> {
        let mut tx = pool.begin().await?;
        let revision_id = UniqueIdRepo::generate_in(&mut *tx, ObjectKind::WikiRevision).await?;

        let job = Self::find_in_topic(&mut *tx, topic_id, job_id).await?;
        let topic = TopicRepo::find_in(&mut *tx, topic_id)
            .await?
            .ok_or_else(|| CoreError::not_found("topic", topic_id))?;
        let mut aggregate = job.aggregate()?;

        if let Some(applied_id) = aggregate.applied_revision_id() {
            if let Some(revision) = WikiRevisionRepo::find_in(&mut *tx, applied_id).await? {
                // Nothing to write; rolling back also releases the unused id.
                tx.rollback().await?;
                tracing::info!(
                    merge_job_id = %job_id,
                    revision_id = %revision.id,
                    "Merge job already applied, returning recorded revision"
                );
                return Ok(AppliedMerge {
                    job,
                    revision,
                    replayed: true,
                });
            }
        }

        if aggregate.status() == MergeJobStatus::Pending {
            aggregate.mark_reviewed(applier_id)?;
        }

        let now = Utc::now();
        let mut pointer = TopicAggregate::new(topic.id, topic.current_wiki_revision_id);
        let revision = WikiRevisionRepo::insert_in(
            &mut *tx,
            &revision_id,
            topic_id,
            applier_id,
            &input.revision(),
            pointer.current_revision_id(),
            now,
        )
        .await?;

        aggregate.apply(&revision.id, applier_id)?;
        pointer.apply_wiki_revision(&revision.id)?;
        TopicRepo::set_current_revision_in(&mut *tx, topic_id, pointer.current_revision_id(), now)
            .await?;

        let archived = Self::archive_posts(&mut *tx, job_id, now).await?;
        let authors = Self::post_authors(&mut *tx, job_id).await?;
        let credits = distribute_credits(authors, input.contribution_weight);
        for credit in &credits {
            let credit_id =
                UniqueIdRepo::generate_in(&mut *tx, ObjectKind::ContributionCredit).await?;
            sqlx::query(
                "INSERT INTO contribution_credits
                    (id, topic_id, revision_id, user_id, weight, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&credit_id)
            .bind(topic_id)
            .bind(&revision.id)
            .bind(&credit.user_id)
            .bind(credit.weight)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let updated = Self::persist_state(
            &mut *tx,
            &job,
            aggregate.status(),
            aggregate.reviewer_id(),
            aggregate.applied_revision_id(),
            Some(now),
            now,
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            merge_job_id = %job_id,
            topic_id = %topic_id,
            revision_id = %revision.id,
            archived_posts = archived,
            credits = credits.len(),
            "Merge job applied"
        );
        Ok(AppliedMerge {
            job: updated,
            revision,
            replayed: false,
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Load the job and check it belongs to the topic; otherwise not found.
    async fn find_in_topic(
        conn: &mut SqliteConnection,
        topic_id: &str,
        job_id: &str,
    ) -> Result<MergeJob, RepoError> {
        Self::find_in(conn, job_id)
            .await?
            .filter(|job| job.topic_id == topic_id)
            .ok_or_else(|| CoreError::not_found("merge_job", job_id).into())
    }

    /// Write the aggregate's state back, guarded by the status that was read.
    async fn persist_state(
        conn: &mut SqliteConnection,
        previous: &MergeJob,
        status: MergeJobStatus,
        reviewer_id: Option<&str>,
        applied_revision_id: Option<&str>,
        applied_at: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<MergeJob, RepoError> {
        let query = format!(
            "UPDATE merge_jobs
             SET status = ?1,
                 reviewer_id = ?2,
                 applied_revision_id = COALESCE(?3, applied_revision_id),
                 applied_at = COALESCE(?4, applied_at),
                 updated_at = ?5
             WHERE id = ?6 AND status = ?7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MergeJob>(&query)
            .bind(status.as_str())
            .bind(reviewer_id)
            .bind(applied_revision_id)
            .bind(applied_at)
            .bind(now)
            .bind(&previous.id)
            .bind(&previous.status)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!("Merge job {} changed concurrently", previous.id))
                    .into()
            })
    }

    /// Archive every referenced post. Already-archived posts keep their
    /// original `archived_at`.
    async fn archive_posts(
        conn: &mut SqliteConnection,
        job_id: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts
             SET merge_state = ?1, archived_at = COALESCE(archived_at, ?2), updated_at = ?2
             WHERE id IN (SELECT post_id FROM merge_job_post_refs WHERE merge_job_id = ?3)",
        )
        .bind(PostMergeState::Archived.as_str())
        .bind(now)
        .bind(job_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// One author per referenced post, in proposal order.
    async fn post_authors(
        conn: &mut SqliteConnection,
        job_id: &str,
    ) -> Result<Vec<ObjectId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT p.user_id
             FROM merge_job_post_refs r
             JOIN posts p ON p.id = r.post_id
             WHERE r.merge_job_id = ?1
             ORDER BY r.id ASC",
        )
        .bind(job_id)
        .fetch_all(conn)
        .await
    }
}
