//! Handlers for replies and post votes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::ObjectId;
use quire_db::models::post::CreatePost;
use quire_db::models::vote::CastVote;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /topics/{id}/posts
// ---------------------------------------------------------------------------

/// List a topic's posts oldest first, archived ones included.
pub async fn list_posts(
    State(state): State<AppState>,
    Path(topic_id): Path<ObjectId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request()?;
    let posts = state.forum.list_posts(&topic_id, page).await?;
    Ok(Json(DataResponse { data: posts }))
}

// ---------------------------------------------------------------------------
// POST /topics/{id}/posts
// ---------------------------------------------------------------------------

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<ObjectId>,
    Json(body): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    let post = state
        .forum
        .create_post(&auth.caller, &topic_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

// ---------------------------------------------------------------------------
// POST /posts/{id}/votes
// ---------------------------------------------------------------------------

pub async fn vote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ObjectId>,
    Json(body): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.forum.vote_post(&auth.caller, &id, body.value).await?;
    Ok(Json(DataResponse { data: outcome }))
}
