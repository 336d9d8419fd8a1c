//! Route definitions for boards, mounted at `/boards`.
//!
//! ```text
//! POST /                  create_board
//! GET  /{id}              get_board
//! GET  /{id}/topics       list_topics
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::board;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(board::create_board))
        .route("/{id}", get(board::get_board))
        .route("/{id}/topics", get(board::list_topics))
}
