//! Row structs and request DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts

pub mod board;
pub mod contribution;
pub mod doc_link;
pub mod merge_job;
pub mod post;
pub mod solution;
pub mod topic;
pub mod vote;
pub mod wiki_revision;
