//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&DbPool` as the first argument. Methods that write more than one
//! row run in a single transaction and restart it on lock contention.

pub mod board_repo;
pub mod contribution_repo;
pub mod doc_link_repo;
pub mod merge_job_repo;
pub mod post_repo;
pub mod solution_repo;
pub mod topic_repo;
pub mod unique_id_repo;
pub mod vote_repo;
pub mod wiki_revision_repo;

pub use board_repo::BoardRepo;
pub use contribution_repo::ContributionRepo;
pub use doc_link_repo::{DocLinkRepo, PoolLinkSource};
pub use merge_job_repo::MergeJobRepo;
pub use post_repo::PostRepo;
pub use solution_repo::SolutionRepo;
pub use topic_repo::TopicRepo;
pub use unique_id_repo::UniqueIdRepo;
pub use vote_repo::{PostVotes, TopicVotes, VoteRepo, VoteTarget};
pub use wiki_revision_repo::WikiRevisionRepo;
