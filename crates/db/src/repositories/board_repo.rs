//! Repository for the `boards` table.

use chrono::Utc;
use quire_core::object_kind::ObjectKind;
use quire_core::topic::BoardStatus;

use crate::models::board::{Board, CreateBoard};
use crate::repositories::UniqueIdRepo;
use crate::DbPool;

/// Column list for boards queries.
const COLUMNS: &str = "id, creator_id, slug, name, description, status, created_at, updated_at";

pub struct BoardRepo;

impl BoardRepo {
    /// Insert a new active board. A taken slug surfaces as a unique violation.
    pub async fn create(
        pool: &DbPool,
        creator_id: &str,
        input: &CreateBoard,
    ) -> Result<Board, sqlx::Error> {
        let id = UniqueIdRepo::generate(pool, ObjectKind::Board).await?;
        let now = Utc::now();
        let query = format!(
            "INSERT INTO boards
                (id, creator_id, slug, name, description, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Board>(&query)
            .bind(&id)
            .bind(creator_id)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.description)
            .bind(BoardStatus::Active.as_str())
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<Board>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boards WHERE id = ?1");
        sqlx::query_as::<_, Board>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
