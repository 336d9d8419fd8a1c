//! Document link models and DTOs.

use quire_core::doc_graph::DirectedLink;
use quire_core::topic::DocLinkType;
use quire_core::types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `doc_links` table: a directed edge between topics.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DocLink {
    pub id: ObjectId,
    pub source_topic_id: ObjectId,
    pub target_topic_id: ObjectId,
    pub link_type: String,
    pub created_at: Timestamp,
}

impl DirectedLink for DocLink {
    fn source_id(&self) -> &str {
        &self.source_topic_id
    }

    fn target_id(&self) -> &str {
        &self.target_topic_id
    }
}

/// DTO for linking two topics.
#[derive(Debug, Deserialize)]
pub struct CreateDocLink {
    pub source_topic_id: ObjectId,
    pub target_topic_id: ObjectId,
    /// Defaults to `related`.
    pub link_type: Option<DocLinkType>,
}
