//! Bounded breadth-first expansion over directed topic links.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::ObjectId;

/// Depth used when the caller gives none (or a non-positive one).
pub const DEFAULT_GRAPH_DEPTH: u32 = 2;

/// Deepest expansion a caller may request.
pub const MAX_GRAPH_DEPTH: u32 = 5;

pub fn clamp_depth(requested: Option<i32>) -> u32 {
    match requested {
        Some(depth) if depth > 0 => (depth as u32).min(MAX_GRAPH_DEPTH),
        _ => DEFAULT_GRAPH_DEPTH,
    }
}

/// An edge with a source and target topic.
pub trait DirectedLink {
    fn source_id(&self) -> &str;
    fn target_id(&self) -> &str;
}

/// Where the traversal fetches outgoing edges from, one layer at a time.
#[async_trait]
pub trait LinkSource: Send + Sync {
    type Link: DirectedLink + Send;
    type Error: Send;

    /// Every link whose source is one of `sources`.
    async fn outgoing(&self, sources: &[ObjectId]) -> Result<Vec<Self::Link>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocGraph<L> {
    /// Every reached topic, lexicographically ordered.
    pub nodes: Vec<ObjectId>,
    /// Every traversed link, including back-edges and duplicates.
    pub edges: Vec<L>,
}

/// Expand from `root` for at most `depth` layers.
///
/// Each layer fetches the links leaving the previous layer; all of them are
/// kept as edges, but only unseen targets form the next layer. Stops early
/// when a layer yields no links.
pub async fn traverse<S>(
    source: &S,
    root: &str,
    depth: u32,
) -> Result<DocGraph<S::Link>, S::Error>
where
    S: LinkSource + ?Sized,
{
    let mut visited: BTreeSet<ObjectId> = BTreeSet::new();
    visited.insert(root.to_owned());
    let mut frontier = vec![root.to_owned()];
    let mut edges = Vec::new();

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let links = source.outgoing(&frontier).await?;
        if links.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for link in links {
            if visited.insert(link.target_id().to_owned()) {
                next.push(link.target_id().to_owned());
            }
            edges.push(link);
        }
        frontier = next;
    }

    Ok(DocGraph {
        nodes: visited.into_iter().collect(),
        edges,
    })
}
