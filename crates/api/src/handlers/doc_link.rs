//! Handlers for document links and the bounded link graph.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_db::models::doc_link::CreateDocLink;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::DocGraphParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /doc-links
pub async fn create_link(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<CreateDocLink>,
) -> AppResult<impl IntoResponse> {
    let link = state.forum.add_doc_link(&body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// GET /doc-graph?root_topic_id=&depth=
pub async fn get_graph(
    State(state): State<AppState>,
    Query(params): Query<DocGraphParams>,
) -> AppResult<impl IntoResponse> {
    let graph = state
        .forum
        .get_doc_graph(&params.root_topic_id, params.depth)
        .await?;
    Ok(Json(DataResponse { data: graph }))
}
