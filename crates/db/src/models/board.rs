//! Board models and DTOs.

use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Board {
    pub id: ObjectId,
    pub creator_id: ObjectId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a board.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoard {
    #[validate(length(min = 2, max = 100))]
    pub slug: String,
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}
