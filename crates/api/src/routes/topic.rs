//! Route definitions for topics and everything scoped under one, mounted at
//! `/topics`.
//!
//! ```text
//! POST /                                     create_topic
//! GET  /{id}                                 get_topic
//! PUT  /{id}/status                          set_status
//! GET  /{id}/posts                           list_posts
//! POST /{id}/posts                           create_post
//! GET  /{id}/wiki                            get_current
//! GET  /{id}/wiki/revisions                  list_revisions
//! POST /{id}/wiki/revisions                  create_revision
//! GET  /{id}/wiki/revisions/{revision_id}    get_revision
//! POST /{id}/merge-jobs                      create_merge_job
//! GET  /{id}/merge-jobs/{job_id}             get_merge_job
//! POST /{id}/merge-jobs/{job_id}/review      review_merge_job
//! POST /{id}/merge-jobs/{job_id}/apply       apply_merge_job
//! GET  /{id}/contributors                    list_contributors
//! PUT  /{id}/solution                        set_solution
//! POST /{id}/votes                           vote
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{merge_job, post as post_handlers, topic, wiki};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(topic::create_topic))
        .route("/{id}", get(topic::get_topic))
        .route("/{id}/status", put(topic::set_status))
        .route(
            "/{id}/posts",
            get(post_handlers::list_posts).post(post_handlers::create_post),
        )
        .route("/{id}/wiki", get(wiki::get_current))
        .route(
            "/{id}/wiki/revisions",
            get(wiki::list_revisions).post(wiki::create_revision),
        )
        .route(
            "/{id}/wiki/revisions/{revision_id}",
            get(wiki::get_revision),
        )
        .route("/{id}/merge-jobs", post(merge_job::create_merge_job))
        .route("/{id}/merge-jobs/{job_id}", get(merge_job::get_merge_job))
        .route(
            "/{id}/merge-jobs/{job_id}/review",
            post(merge_job::review_merge_job),
        )
        .route(
            "/{id}/merge-jobs/{job_id}/apply",
            post(merge_job::apply_merge_job),
        )
        .route("/{id}/contributors", get(topic::list_contributors))
        .route("/{id}/solution", put(topic::set_solution))
        .route("/{id}/votes", post(topic::vote))
}
