//! Vote ledger for topics and posts.
//!
//! Both targets share one algorithm; the table names come from a
//! [`VoteTarget`] type picked at the call site, e.g.
//! `VoteRepo::upsert::<PostVotes>(..)`.

use chrono::Utc;
use quire_core::object_kind::ObjectKind;
use quire_core::vote::{vote_delta, VoteValue};

use crate::models::vote::VoteOutcome;
use crate::repositories::UniqueIdRepo;
use crate::retry::with_retry;
use crate::DbPool;

/// Storage layout of one votable target kind.
pub trait VoteTarget {
    /// Entity name used in not-found errors.
    const TARGET_NAME: &'static str;
    /// Kind of the vote rows' identifiers.
    const VOTE_KIND: ObjectKind;
    const VOTE_TABLE: &'static str;
    /// Column in `VOTE_TABLE` referencing the target.
    const TARGET_COLUMN: &'static str;
    /// Table holding the target rows and their cached `vote_count`.
    const COUNTER_TABLE: &'static str;
}

pub struct TopicVotes;

impl VoteTarget for TopicVotes {
    const TARGET_NAME: &'static str = "topic";
    const VOTE_KIND: ObjectKind = ObjectKind::TopicVote;
    const VOTE_TABLE: &'static str = "topic_votes";
    const TARGET_COLUMN: &'static str = "topic_id";
    const COUNTER_TABLE: &'static str = "topics";
}

pub struct PostVotes;

impl VoteTarget for PostVotes {
    const TARGET_NAME: &'static str = "post";
    const VOTE_KIND: ObjectKind = ObjectKind::PostVote;
    const VOTE_TABLE: &'static str = "post_votes";
    const TARGET_COLUMN: &'static str = "post_id";
    const COUNTER_TABLE: &'static str = "posts";
}

pub struct VoteRepo;

impl VoteRepo {
    /// Record `user_id`'s vote on the target and move the target's cached
    /// counter by the difference from their previous vote.
    ///
    /// The counter is only ever adjusted relatively, in the same transaction
    /// as the vote row, so it always equals the sum of current votes.
    ///
    /// Every call allocates a vote id before reading, which takes the write
    /// lock up front. A re-vote that updates the existing row therefore
    /// still consumes one `uniqid` sequence value.
    pub async fn upsert<T: VoteTarget>(
        pool: &DbPool,
        target_id: &str,
        user_id: &str,
        value: VoteValue,
    ) -> Result<VoteOutcome, sqlx::Error> {
        with_retry(|| Self::upsert_once::<T>(pool, target_id, user_id, value)).await
    }

    async fn upsert_once<T: VoteTarget>(
        pool: &DbPool,
        target_id: &str,
        user_id: &str,
        value: VoteValue,
    ) -> Result<VoteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        // Allocated before the read so the transaction already holds the
        // write lock; burned when the vote row already exists.
        let id = UniqueIdRepo::generate_in(&mut *tx, T::VOTE_KIND).await?;
        let now = Utc::now();

        let select = format!(
            "SELECT value FROM {} WHERE {} = ?1 AND user_id = ?2",
            T::VOTE_TABLE,
            T::TARGET_COLUMN
        );
        let previous: Option<i64> = sqlx::query_scalar(&select)
            .bind(target_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let previous = previous
            .map(VoteValue::try_from)
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        match previous {
            None => {
                let insert = format!(
                    "INSERT INTO {} (id, {}, user_id, value, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    T::VOTE_TABLE,
                    T::TARGET_COLUMN
                );
                sqlx::query(&insert)
                    .bind(&id)
                    .bind(target_id)
                    .bind(user_id)
                    .bind(value.as_i64())
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
            Some(old) if old != value => {
                let update = format!(
                    "UPDATE {} SET value = ?1, updated_at = ?2 WHERE {} = ?3 AND user_id = ?4",
                    T::VOTE_TABLE,
                    T::TARGET_COLUMN
                );
                sqlx::query(&update)
                    .bind(value.as_i64())
                    .bind(now)
                    .bind(target_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            Some(_) => {}
        }

        let delta = vote_delta(previous, value);
        if delta != 0 {
            let bump = format!(
                "UPDATE {} SET vote_count = vote_count + ?1 WHERE id = ?2",
                T::COUNTER_TABLE
            );
            sqlx::query(&bump)
                .bind(delta)
                .bind(target_id)
                .execute(&mut *tx)
                .await?;
        }

        let count = format!("SELECT vote_count FROM {} WHERE id = ?1", T::COUNTER_TABLE);
        let vote_count: i64 = sqlx::query_scalar(&count)
            .bind(target_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(
            target = T::TARGET_NAME,
            target_id = %target_id,
            user_id = %user_id,
            value = value.as_i64(),
            delta,
            "Vote recorded"
        );
        Ok(VoteOutcome {
            target_id: target_id.to_owned(),
            value: value.as_i64(),
            delta,
            vote_count,
        })
    }
}
