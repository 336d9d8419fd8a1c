//! Route definitions for post-level actions, mounted at `/posts`.
//!
//! ```text
//! POST /{id}/votes        vote
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::post as post_handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/votes", post(post_handlers::vote))
}
