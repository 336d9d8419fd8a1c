//! Route definitions for the document graph.
//!
//! ```text
//! POST /doc-links         create_link
//! GET  /doc-graph         get_graph (?root_topic_id, depth)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::doc_link;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/doc-links", post(doc_link::create_link))
        .route("/doc-graph", get(doc_link::get_graph))
}
