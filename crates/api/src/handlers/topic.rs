//! Handlers for topics: creation, status, solutions, votes and contributors.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::ObjectId;
use quire_db::models::solution::SetTopicSolution;
use quire_db::models::topic::{CreateTopic, UpdateTopicStatus};
use quire_db::models::vote::CastVote;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /topics
// ---------------------------------------------------------------------------

pub async fn create_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTopic>,
) -> AppResult<impl IntoResponse> {
    let topic = state.forum.create_topic(&auth.caller, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: topic })))
}

// ---------------------------------------------------------------------------
// GET /topics/{id}
// ---------------------------------------------------------------------------

pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<ObjectId>,
) -> AppResult<impl IntoResponse> {
    let topic = state.forum.get_topic(&id).await?;
    Ok(Json(DataResponse { data: topic }))
}

// ---------------------------------------------------------------------------
// PUT /topics/{id}/status
// ---------------------------------------------------------------------------

/// Open or close a topic. Admin or moderator only.
pub async fn set_status(
    State(state): State<AppState>,
    RequireModerator(auth): RequireModerator,
    Path(id): Path<ObjectId>,
    Json(body): Json<UpdateTopicStatus>,
) -> AppResult<impl IntoResponse> {
    let topic = state
        .forum
        .set_topic_status(&auth.caller, &id, body.status)
        .await?;
    Ok(Json(DataResponse { data: topic }))
}

// ---------------------------------------------------------------------------
// PUT /topics/{id}/solution
// ---------------------------------------------------------------------------

pub async fn set_solution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ObjectId>,
    Json(body): Json<SetTopicSolution>,
) -> AppResult<impl IntoResponse> {
    let solution = state
        .forum
        .set_topic_solution(&auth.caller, &id, &body.post_id)
        .await?;
    Ok(Json(DataResponse { data: solution }))
}

// ---------------------------------------------------------------------------
// POST /topics/{id}/votes
// ---------------------------------------------------------------------------

pub async fn vote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ObjectId>,
    Json(body): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.forum.vote_topic(&auth.caller, &id, body.value).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// GET /topics/{id}/contributors
// ---------------------------------------------------------------------------

/// Per-user credit totals, heaviest first.
pub async fn list_contributors(
    State(state): State<AppState>,
    Path(id): Path<ObjectId>,
) -> AppResult<impl IntoResponse> {
    let contributors = state.forum.list_contributors(&id).await?;
    Ok(Json(DataResponse { data: contributors }))
}
