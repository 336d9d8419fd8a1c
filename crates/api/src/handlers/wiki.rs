//! Handlers for a topic's wiki document and its revisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::ObjectId;
use quire_db::models::wiki_revision::CreateWikiRevision;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /topics/{id}/wiki -- the current revision, or `null` before the first.
pub async fn get_current(
    State(state): State<AppState>,
    Path(topic_id): Path<ObjectId>,
) -> AppResult<impl IntoResponse> {
    let revision = state.forum.get_current_wiki(&topic_id).await?;
    Ok(Json(DataResponse { data: revision }))
}

/// GET /topics/{id}/wiki/revisions -- newest first.
pub async fn list_revisions(
    State(state): State<AppState>,
    Path(topic_id): Path<ObjectId>,
) -> AppResult<impl IntoResponse> {
    let revisions = state.forum.list_wiki_revisions(&topic_id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

/// POST /topics/{id}/wiki/revisions
pub async fn create_revision(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<ObjectId>,
    Json(body): Json<CreateWikiRevision>,
) -> AppResult<impl IntoResponse> {
    let revision = state
        .forum
        .create_wiki_revision(&auth.caller, &topic_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: revision })))
}

/// GET /topics/{id}/wiki/revisions/{revision_id}
pub async fn get_revision(
    State(state): State<AppState>,
    Path((topic_id, revision_id)): Path<(ObjectId, ObjectId)>,
) -> AppResult<impl IntoResponse> {
    let revision = state
        .forum
        .get_wiki_revision(&topic_id, &revision_id)
        .await?;
    Ok(Json(DataResponse { data: revision }))
}
