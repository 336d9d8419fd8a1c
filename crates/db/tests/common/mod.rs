#![allow(dead_code)]

use std::time::Duration;

use quire_core::topic::TopicKind;
use quire_db::models::board::{Board, CreateBoard};
use quire_db::models::post::{CreatePost, Post};
use quire_db::models::topic::{CreateTopic, Topic};
use quire_db::repositories::{BoardRepo, PostRepo, TopicRepo};
use quire_db::DbPool;
use tempfile::TempDir;

pub const ADMIN: &str = "10010000000000001";
pub const ALICE: &str = "10010000000000002";
pub const BOB: &str = "10010000000000003";

pub async fn seed_board(pool: &DbPool, slug: &str) -> Board {
    let input = CreateBoard {
        slug: slug.to_string(),
        name: format!("Board {slug}"),
        description: String::new(),
    };
    BoardRepo::create(pool, ADMIN, &input).await.unwrap()
}

pub async fn seed_topic(pool: &DbPool, board_id: &str, wiki: bool) -> Topic {
    let input = CreateTopic {
        board_id: board_id.to_string(),
        title: "How do lifetimes work?".to_string(),
        topic_kind: Some(TopicKind::Knowledge),
        is_wiki_enabled: wiki,
    };
    TopicRepo::create(pool, ALICE, &input).await.unwrap()
}

pub async fn seed_post(pool: &DbPool, topic_id: &str, user_id: &str, text: &str) -> Post {
    let input = CreatePost {
        original_text: text.to_string(),
    };
    PostRepo::create(pool, topic_id, user_id, &input).await.unwrap()
}

/// A topic on a fresh board, ready for replies.
pub async fn seed_wiki_topic(pool: &DbPool) -> Topic {
    let board = seed_board(pool, "rust").await;
    seed_topic(pool, &board.id, true).await
}

/// A file-backed pool configured like production, for tests that need
/// several connections writing at once.
pub async fn file_pool() -> (TempDir, DbPool) {
    file_pool_with_busy_timeout(quire_db::BUSY_TIMEOUT).await
}

/// A migrated file-backed pool whose connections wait `busy_timeout` on a
/// locked database before failing busy.
pub async fn file_pool_with_busy_timeout(busy_timeout: Duration) -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("quire.db").display());
    let pool = quire_db::create_pool_with(&url, 8, busy_timeout).await.unwrap();
    quire_db::run_migrations(&pool).await.unwrap();
    (dir, pool)
}
