pub mod board;
pub mod doc_link;
pub mod merge_job;
pub mod post;
pub mod topic;
pub mod wiki;
