pub mod board;
pub mod doc_link;
pub mod health;
pub mod post;
pub mod topic;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /boards                                          create (moderator)
/// /boards/{id}                                     get
/// /boards/{id}/topics                              list (?page, page_size)
///
/// /topics                                          create (auth)
/// /topics/{id}                                     get
/// /topics/{id}/status                              open/close (PUT, moderator)
/// /topics/{id}/posts                               list, reply (auth)
/// /topics/{id}/wiki                                current revision
/// /topics/{id}/wiki/revisions                      list, create (auth)
/// /topics/{id}/wiki/revisions/{revision_id}        get
/// /topics/{id}/merge-jobs                          propose (auth)
/// /topics/{id}/merge-jobs/{job_id}                 get with post refs
/// /topics/{id}/merge-jobs/{job_id}/review          review (moderator)
/// /topics/{id}/merge-jobs/{job_id}/apply           apply (moderator)
/// /topics/{id}/contributors                        credit totals
/// /topics/{id}/solution                            set (PUT, auth)
/// /topics/{id}/votes                               vote (auth)
///
/// /posts/{id}/votes                                vote (auth)
///
/// /doc-links                                       create (auth)
/// /doc-graph                                       expand (?root_topic_id, depth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/boards", board::router())
        .nest("/topics", topic::router())
        .nest("/posts", post::router())
        .merge(doc_link::router())
}
