mod common;

use quire_core::doc_graph::traverse;
use quire_core::topic::DocLinkType;
use quire_db::repositories::{DocLinkRepo, PoolLinkSource};
use sqlx::SqlitePool;

/// Four topics linked as a chain A -> B -> C -> D.
async fn seed_chain(pool: &SqlitePool) -> Vec<String> {
    let board = common::seed_board(pool, "graph").await;
    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(common::seed_topic(pool, &board.id, false).await.id);
    }
    for pair in ids.windows(2) {
        DocLinkRepo::create(pool, &pair[0], &pair[1], DocLinkType::Related)
            .await
            .unwrap();
    }
    ids
}

#[sqlx::test(migrations = "./migrations")]
async fn test_depth_bounds_the_chain(pool: SqlitePool) {
    let ids = seed_chain(&pool).await;
    let source = PoolLinkSource::new(&pool);

    let two = traverse(&source, &ids[0], 2).await.unwrap();
    assert_eq!(two.nodes, ids[..3].to_vec());
    assert_eq!(two.edges.len(), 2);

    let one = traverse(&source, &ids[0], 1).await.unwrap();
    assert_eq!(one.nodes, ids[..2].to_vec());
    assert_eq!(one.edges[0].source_topic_id, ids[0]);
    assert_eq!(one.edges[0].target_topic_id, ids[1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_and_back_edges_are_reported(pool: SqlitePool) {
    let ids = seed_chain(&pool).await;
    DocLinkRepo::create(&pool, &ids[0], &ids[1], DocLinkType::Related)
        .await
        .unwrap();
    DocLinkRepo::create(&pool, &ids[1], &ids[0], DocLinkType::Related)
        .await
        .unwrap();

    let graph = traverse(&PoolLinkSource::new(&pool), &ids[0], 2).await.unwrap();
    assert_eq!(graph.nodes, ids[..3].to_vec());
    // A->B twice in layer one; B->C and B->A in layer two.
    assert_eq!(graph.edges.len(), 4);
    assert!(graph
        .edges
        .iter()
        .any(|e| e.source_topic_id == ids[1] && e.target_topic_id == ids[0]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_sources_filters(pool: SqlitePool) {
    let ids = seed_chain(&pool).await;

    let links = DocLinkRepo::list_by_sources(&pool, &ids[1..3]).await.unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.link_type == "related"));
    assert!(DocLinkRepo::list_by_sources(&pool, &[]).await.unwrap().is_empty());
}
