//! Repository for the `doc_links` table and the pool-backed link source used
//! by graph traversal.

use async_trait::async_trait;
use chrono::Utc;
use quire_core::doc_graph::LinkSource;
use quire_core::object_kind::ObjectKind;
use quire_core::topic::DocLinkType;
use quire_core::types::ObjectId;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::doc_link::DocLink;
use crate::repositories::UniqueIdRepo;
use crate::DbPool;

/// Column list for doc_links queries.
const COLUMNS: &str = "id, source_topic_id, target_topic_id, link_type, created_at";

pub struct DocLinkRepo;

impl DocLinkRepo {
    /// Insert a directed link. Duplicate edges are allowed.
    pub async fn create(
        pool: &DbPool,
        source_topic_id: &str,
        target_topic_id: &str,
        link_type: DocLinkType,
    ) -> Result<DocLink, sqlx::Error> {
        let id = UniqueIdRepo::generate(pool, ObjectKind::DocLink).await?;
        let query = format!(
            "INSERT INTO doc_links (id, source_topic_id, target_topic_id, link_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocLink>(&query)
            .bind(&id)
            .bind(source_topic_id)
            .bind(target_topic_id)
            .bind(link_type.as_str())
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// All links leaving any of `source_ids`, in creation order.
    pub async fn list_by_sources(
        pool: &DbPool,
        source_ids: &[ObjectId],
    ) -> Result<Vec<DocLink>, sqlx::Error> {
        if source_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM doc_links WHERE source_topic_id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in source_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(") ORDER BY id ASC");
        builder.build_query_as::<DocLink>().fetch_all(pool).await
    }
}

/// [`LinkSource`] reading one traversal layer per query.
pub struct PoolLinkSource<'a> {
    pool: &'a DbPool,
}

impl<'a> PoolLinkSource<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkSource for PoolLinkSource<'_> {
    type Link = DocLink;
    type Error = sqlx::Error;

    async fn outgoing(&self, sources: &[ObjectId]) -> Result<Vec<DocLink>, sqlx::Error> {
        DocLinkRepo::list_by_sources(self.pool, sources).await
    }
}
