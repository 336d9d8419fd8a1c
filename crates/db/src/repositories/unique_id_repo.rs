//! Identifier generator backed by the `uniqid` sequence table.

use quire_core::object_kind::{format_object_id, ObjectKind};
use quire_core::types::ObjectId;
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::retry::with_retry;
use crate::DbPool;

pub struct UniqueIdRepo;

impl UniqueIdRepo {
    /// Allocate an identifier in its own statement, retrying on busy/locked.
    pub async fn generate(pool: &DbPool, kind: ObjectKind) -> Result<ObjectId, sqlx::Error> {
        with_retry(|| Self::allocate(pool, kind)).await
    }

    /// Allocate an identifier on a connection that is inside a transaction.
    ///
    /// Write units call this as their first statement so that the
    /// transaction holds the write lock before it reads anything; retrying
    /// is left to the enclosing unit.
    pub async fn generate_in(
        conn: &mut SqliteConnection,
        kind: ObjectKind,
    ) -> Result<ObjectId, sqlx::Error> {
        Self::allocate(conn, kind).await
    }

    async fn allocate<'e, E>(executor: E, kind: ObjectKind) -> Result<ObjectId, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("INSERT INTO uniqid (uniqid_type) VALUES (?1)")
            .bind(i64::from(kind.tag()))
            .execute(executor)
            .await?;
        format_object_id(kind, result.last_insert_rowid())
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))
    }
}
