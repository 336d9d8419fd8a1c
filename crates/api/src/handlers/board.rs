//! Handlers for boards and the topics listed under them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::ObjectId;
use quire_db::models::board::CreateBoard;

use crate::error::AppResult;
use crate::middleware::rbac::RequireModerator;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /boards
// ---------------------------------------------------------------------------

/// Create a board. Admin or moderator only.
pub async fn create_board(
    State(state): State<AppState>,
    RequireModerator(auth): RequireModerator,
    Json(body): Json<CreateBoard>,
) -> AppResult<impl IntoResponse> {
    let board = state.forum.create_board(&auth.caller, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: board })))
}

// ---------------------------------------------------------------------------
// GET /boards/{id}
// ---------------------------------------------------------------------------

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<ObjectId>,
) -> AppResult<impl IntoResponse> {
    let board = state.forum.get_board(&id).await?;
    Ok(Json(DataResponse { data: board }))
}

// ---------------------------------------------------------------------------
// GET /boards/{id}/topics
// ---------------------------------------------------------------------------

/// List a board's topics, newest first (`?page=&page_size=`).
pub async fn list_topics(
    State(state): State<AppState>,
    Path(id): Path<ObjectId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request()?;
    let topics = state.forum.list_topics(&id, page).await?;
    Ok(Json(DataResponse { data: topics }))
}
