//! HTTP-level integration tests for the `/api/v1` forum endpoints.
//!
//! Each test drives the full router (auth extractors, error mapping,
//! middleware) against a fresh SQLite database.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    admin_token, body_json, get, moderator_token, post_json_auth, put_json_auth, send, user_token,
    ALICE, BOB,
};
use serde_json::json;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_board(app: &Router, slug: &str) -> String {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/boards",
        &admin_token(),
        json!({ "slug": slug, "name": "Rust help" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_topic(app: &Router, board_id: &str, wiki: bool) -> String {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/topics",
        &user_token(ALICE),
        json!({
            "board_id": board_id,
            "title": "Borrow checker tips",
            "topic_kind": "knowledge",
            "is_wiki_enabled": wiki,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_post(app: &Router, topic_id: &str, user_id: &str, text: &str) -> String {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/posts"),
        &user_token(user_id),
        json!({ "original_text": text }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Health and auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_database(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["schema_current"], true);
    assert_eq!(json["schema_version"], quire_db::latest_migration().unwrap());
}

#[sqlx::test(migrations = false)]
async fn test_health_is_degraded_without_schema(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
    assert!(json["schema_version"].is_null());
    assert_eq!(json["schema_current"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_creation_requires_elevated_role(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let body = json!({ "slug": "rust", "name": "Rust help" });

    let anonymous =
        send(app.clone(), Method::POST, "/api/v1/boards", None, Some(body.clone())).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let garbage = post_json_auth(app.clone(), "/api/v1/boards", "not-a-jwt", body.clone()).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let user =
        post_json_auth(app.clone(), "/api/v1/boards", &user_token(ALICE), body.clone()).await;
    assert_eq!(user.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(user).await["code"], "FORBIDDEN");

    let moderator = post_json_auth(app, "/api/v1/boards", &moderator_token(), body).await;
    assert_eq!(moderator.status(), StatusCode::CREATED);
    let json = body_json(moderator).await;
    assert_eq!(json["data"]["slug"], "rust");
    assert_eq!(json["data"]["status"], "active");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_slug_rules(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    create_board(&app, "rust").await;

    let duplicate = post_json_auth(
        app.clone(),
        "/api/v1/boards",
        &admin_token(),
        json!({ "slug": "rust", "name": "Again" }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(duplicate).await["code"], "CONFLICT");

    let malformed = post_json_auth(
        app,
        "/api/v1/boards",
        &admin_token(),
        json!({ "slug": "Not A Slug", "name": "Bad" }),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(malformed).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Topics and posts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_topic_listing_is_paginated(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    for _ in 0..3 {
        create_topic(&app, &board_id, false).await;
    }

    let response = get(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/topics?page=1&page_size=2"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);

    let too_big = get(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/topics?page_size=101"),
    )
    .await;
    assert_eq!(too_big.status(), StatusCode::BAD_REQUEST);

    let zero_page = get(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/topics?page=0"),
    )
    .await;
    assert_eq!(zero_page.status(), StatusCode::OK);
    let json = body_json(zero_page).await;
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 3);

    let negative = get(
        app.clone(),
        &format!("/api/v1/boards/{board_id}/topics?page=-1"),
    )
    .await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let missing = get(app, "/api/v1/boards/10110000000009999/topics").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_closed_topic_refuses_replies(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, false).await;
    create_post(&app, &topic_id, BOB, "first reply").await;

    let by_user = put_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/status"),
        &user_token(ALICE),
        json!({ "status": "closed" }),
    )
    .await;
    assert_eq!(by_user.status(), StatusCode::FORBIDDEN);

    let closed = put_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/status"),
        &moderator_token(),
        json!({ "status": "closed" }),
    )
    .await;
    assert_eq!(closed.status(), StatusCode::OK);
    assert_eq!(body_json(closed).await["data"]["status"], "closed");

    let reply = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/posts"),
        &user_token(BOB),
        json!({ "original_text": "too late" }),
    )
    .await;
    assert_eq!(reply.status(), StatusCode::FORBIDDEN);

    let topic = body_json(get(app, &format!("/api/v1/topics/{topic_id}")).await).await;
    assert_eq!(topic["data"]["post_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_post_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, false).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/topics/{topic_id}/posts"),
        &user_token(BOB),
        json!({ "original_text": "     " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Wiki
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_wiki_requires_enabled_topic(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let plain = create_topic(&app, &board_id, false).await;
    let wiki = create_topic(&app, &board_id, true).await;
    let body = json!({ "title": "Lifetimes", "document": "Elision rules..." });

    let refused = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{plain}/wiki/revisions"),
        &user_token(ALICE),
        body.clone(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let empty = body_json(get(app.clone(), &format!("/api/v1/topics/{wiki}/wiki")).await).await;
    assert!(empty["data"].is_null());

    let first = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{wiki}/wiki/revisions"),
        &user_token(ALICE),
        body.clone(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await["data"].clone();
    assert!(first["parent_revision_id"].is_null());

    let second = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{wiki}/wiki/revisions"),
        &user_token(BOB),
        body,
    )
    .await;
    let second = body_json(second).await["data"].clone();
    assert_eq!(second["parent_revision_id"], first["id"]);

    let current = body_json(get(app.clone(), &format!("/api/v1/topics/{wiki}/wiki")).await).await;
    assert_eq!(current["data"]["id"], second["id"]);

    let listed =
        body_json(get(app.clone(), &format!("/api/v1/topics/{wiki}/wiki/revisions")).await).await;
    let ids: Vec<_> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![second["id"].clone(), first["id"].clone()]);

    let first_id = first["id"].as_str().unwrap();
    let foreign = get(
        app,
        &format!("/api/v1/topics/{plain}/wiki/revisions/{first_id}"),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Merge jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_merge_job_lifecycle_over_http(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, true).await;
    let p1 = create_post(&app, &topic_id, ALICE, "Use references").await;
    let p2 = create_post(&app, &topic_id, BOB, "Or clone it").await;

    let created = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/merge-jobs"),
        &user_token(BOB),
        json!({ "post_ids": [p1, p2], "summary": "fold answers" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["data"]["job"]["status"], "pending");
    assert_eq!(created["data"]["post_refs"].as_array().unwrap().len(), 2);
    let job_id = created["data"]["job"]["id"].as_str().unwrap().to_string();
    let apply_uri = format!("/api/v1/topics/{topic_id}/merge-jobs/{job_id}/apply");
    let payload = json!({
        "title": "Ownership FAQ",
        "document": "Use references, or clone.",
        "contribution_weight": 2,
    });

    let by_user =
        post_json_auth(app.clone(), &apply_uri, &user_token(ALICE), payload.clone()).await;
    assert_eq!(by_user.status(), StatusCode::FORBIDDEN);

    let applied =
        post_json_auth(app.clone(), &apply_uri, &moderator_token(), payload.clone()).await;
    assert_eq!(applied.status(), StatusCode::OK);
    let applied = body_json(applied).await;
    assert_eq!(applied["data"]["job"]["status"], "applied");
    assert_eq!(applied["data"]["replayed"], false);
    let revision_id = applied["data"]["revision"]["id"].clone();

    let replay = post_json_auth(app.clone(), &apply_uri, &moderator_token(), payload).await;
    assert_eq!(replay.status(), StatusCode::OK);
    let replay = body_json(replay).await;
    assert_eq!(replay["data"]["replayed"], true);
    assert_eq!(replay["data"]["revision"]["id"], revision_id);

    let review = post_json_auth(
        app.clone(),
        &format!("/api/v1/topics/{topic_id}/merge-jobs/{job_id}/review"),
        &moderator_token(),
        json!({}),
    )
    .await;
    assert_eq!(review.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(review).await["code"], "INVALID_TRANSITION");

    let contributors = body_json(
        get(app.clone(), &format!("/api/v1/topics/{topic_id}/contributors")).await,
    )
    .await;
    let totals: Vec<_> = contributors["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["user_id"].as_str().unwrap().to_string(), c["total_weight"].as_i64().unwrap()))
        .collect();
    assert_eq!(totals, vec![(ALICE.to_string(), 2), (BOB.to_string(), 2)]);

    let posts_uri = format!("/api/v1/topics/{topic_id}/posts");
    let posts = body_json(get(app.clone(), &posts_uri).await).await;
    for post in posts["data"]["items"].as_array().unwrap() {
        assert_eq!(post["merge_state"], "archived");
        assert!(!post["archived_at"].is_null());
    }

    let wiki = body_json(get(app, &format!("/api/v1/topics/{topic_id}/wiki")).await).await;
    assert_eq!(wiki["data"]["id"], revision_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_merge_job_rejects_foreign_and_duplicate_posts(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, true).await;
    let other_id = create_topic(&app, &board_id, true).await;
    let mine = create_post(&app, &topic_id, ALICE, "in topic").await;
    let foreign = create_post(&app, &other_id, BOB, "elsewhere").await;
    let uri = format!("/api/v1/topics/{topic_id}/merge-jobs");

    let empty =
        post_json_auth(app.clone(), &uri, &user_token(BOB), json!({ "post_ids": [] })).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let duplicate = post_json_auth(
        app.clone(),
        &uri,
        &user_token(BOB),
        json!({ "post_ids": [mine, mine] }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let cross_topic = post_json_auth(
        app.clone(),
        &uri,
        &user_token(BOB),
        json!({ "post_ids": [mine, foreign] }),
    )
    .await;
    assert_eq!(cross_topic.status(), StatusCode::NOT_FOUND);
    let json = body_json(cross_topic).await;
    assert!(json["error"].as_str().unwrap().contains(&foreign));

    let missing_job = get(
        app,
        &format!("/api/v1/topics/{topic_id}/merge-jobs/10150000000009999"),
    )
    .await;
    assert_eq!(missing_job.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Votes and solutions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_votes_move_the_counter(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, false).await;
    let post_id = create_post(&app, &topic_id, ALICE, "answer").await;
    let uri = format!("/api/v1/posts/{post_id}/votes");

    let invalid = post_json_auth(app.clone(), &uri, &user_token(BOB), json!({ "value": 2 })).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let up = post_json_auth(app.clone(), &uri, &user_token(BOB), json!({ "value": 1 })).await;
    let up = body_json(up).await;
    assert_eq!(up["data"]["vote_count"], 1);
    assert_eq!(up["data"]["delta"], 1);

    let flip = post_json_auth(app.clone(), &uri, &user_token(BOB), json!({ "value": -1 })).await;
    let flip = body_json(flip).await;
    assert_eq!(flip["data"]["vote_count"], -1);
    assert_eq!(flip["data"]["delta"], -2);

    let topic_vote = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/topics/{topic_id}/votes"),
            &user_token(BOB),
            json!({ "value": 1 }),
        )
        .await,
    )
    .await;
    assert_eq!(topic_vote["data"]["vote_count"], 1);

    let missing = post_json_auth(
        app,
        "/api/v1/posts/10130000000009999/votes",
        &user_token(BOB),
        json!({ "value": 1 }),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_solution_must_come_from_the_topic(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let topic_id = create_topic(&app, &board_id, false).await;
    let other_id = create_topic(&app, &board_id, false).await;
    let answer = create_post(&app, &topic_id, BOB, "the answer").await;
    let foreign = create_post(&app, &other_id, BOB, "unrelated").await;
    let uri = format!("/api/v1/topics/{topic_id}/solution");

    let rejected =
        put_json_auth(app.clone(), &uri, &user_token(ALICE), json!({ "post_id": foreign })).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let accepted =
        put_json_auth(app.clone(), &uri, &user_token(ALICE), json!({ "post_id": answer })).await;
    assert_eq!(accepted.status(), StatusCode::OK);

    let topic = body_json(get(app, &format!("/api/v1/topics/{topic_id}")).await).await;
    assert_eq!(topic["data"]["solved_post_id"], answer.as_str());
}

// ---------------------------------------------------------------------------
// Document graph
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_doc_graph_over_http(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let board_id = create_board(&app, "rust").await;
    let a = create_topic(&app, &board_id, false).await;
    let b = create_topic(&app, &board_id, false).await;
    let c = create_topic(&app, &board_id, false).await;

    for (source, target) in [(&a, &b), (&b, &c)] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/doc-links",
            &user_token(ALICE),
            json!({ "source_topic_id": source, "target_topic_id": target }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["link_type"], "related");
    }

    let dangling = post_json_auth(
        app.clone(),
        "/api/v1/doc-links",
        &user_token(ALICE),
        json!({ "source_topic_id": a, "target_topic_id": "10120000000009999" }),
    )
    .await;
    assert_eq!(dangling.status(), StatusCode::NOT_FOUND);

    let shallow = body_json(
        get(app.clone(), &format!("/api/v1/doc-graph?root_topic_id={a}&depth=1")).await,
    )
    .await;
    assert_eq!(shallow["data"]["nodes"], json!([a, b]));
    assert_eq!(shallow["data"]["edges"].as_array().unwrap().len(), 1);

    let default_depth =
        body_json(get(app.clone(), &format!("/api/v1/doc-graph?root_topic_id={a}")).await).await;
    assert_eq!(default_depth["data"]["nodes"], json!([a, b, c]));

    let unknown = get(app, "/api/v1/doc-graph?root_topic_id=10120000000009999").await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
