//! Domain logic for collaborative thread editing.
//!
//! Everything here is storage-agnostic: the state machines, invariants and
//! policies are evaluated by the `quire-db` repositories inside their
//! transactions and by the API orchestration layer before delegating.

pub mod contribution;
pub mod doc_graph;
pub mod error;
pub mod merge_job;
pub mod object_kind;
pub mod pagination;
pub mod retry;
pub mod roles;
pub mod topic;
pub mod types;
pub mod validation;
pub mod vote;
