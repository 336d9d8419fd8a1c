//! Handlers for merge jobs: proposing posts to fold into the topic wiki,
//! reviewing and applying.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::ObjectId;
use quire_db::models::merge_job::{ApplyMergeJob, CreateMergeJob};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /topics/{id}/merge-jobs
// ---------------------------------------------------------------------------

pub async fn create_merge_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<ObjectId>,
    Json(body): Json<CreateMergeJob>,
) -> AppResult<impl IntoResponse> {
    let detail = state
        .forum
        .create_merge_job(&auth.caller, &topic_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// GET /topics/{id}/merge-jobs/{job_id}
// ---------------------------------------------------------------------------

/// The job and the posts it names.
pub async fn get_merge_job(
    State(state): State<AppState>,
    Path((topic_id, job_id)): Path<(ObjectId, ObjectId)>,
) -> AppResult<impl IntoResponse> {
    let detail = state.forum.get_merge_job(&topic_id, &job_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// POST /topics/{id}/merge-jobs/{job_id}/review
// ---------------------------------------------------------------------------

pub async fn review_merge_job(
    State(state): State<AppState>,
    RequireModerator(auth): RequireModerator,
    Path((topic_id, job_id)): Path<(ObjectId, ObjectId)>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .forum
        .review_merge_job(&auth.caller, &topic_id, &job_id)
        .await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// POST /topics/{id}/merge-jobs/{job_id}/apply
// ---------------------------------------------------------------------------

/// Apply a job. Replaying an applied job returns 200 with the recorded
/// revision and `replayed: true`.
pub async fn apply_merge_job(
    State(state): State<AppState>,
    RequireModerator(auth): RequireModerator,
    Path((topic_id, job_id)): Path<(ObjectId, ObjectId)>,
    Json(body): Json<ApplyMergeJob>,
) -> AppResult<impl IntoResponse> {
    let applied = state
        .forum
        .apply_merge_job(&auth.caller, &topic_id, &job_id, &body)
        .await?;
    Ok(Json(DataResponse { data: applied }))
}
