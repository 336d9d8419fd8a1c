//! Entity-kind registry and the fixed-width identifier format.
//!
//! An identifier is `1` + the kind tag zero-padded to 3 digits + a sequence
//! number zero-padded to 13 digits, so ids sort by kind, then by allocation
//! order. The tag table is compiled in and never changes at runtime.

use crate::error::CoreError;
use crate::types::ObjectId;

/// Total length of a formatted identifier.
pub const OBJECT_ID_LEN: usize = 17;

/// Largest sequence value that fits the 13-digit field.
pub const MAX_SEQUENCE: i64 = 9_999_999_999_999;

/// Every entity kind that receives generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Board,
    Topic,
    Post,
    WikiRevision,
    MergeJob,
    MergeJobPostRef,
    ContributionCredit,
    DocLink,
    TopicVote,
    PostVote,
    TopicSolution,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 11] = [
        ObjectKind::Board,
        ObjectKind::Topic,
        ObjectKind::Post,
        ObjectKind::WikiRevision,
        ObjectKind::MergeJob,
        ObjectKind::MergeJobPostRef,
        ObjectKind::ContributionCredit,
        ObjectKind::DocLink,
        ObjectKind::TopicVote,
        ObjectKind::PostVote,
        ObjectKind::TopicSolution,
    ];

    /// Numeric tag embedded in every identifier of this kind.
    pub const fn tag(self) -> u16 {
        match self {
            ObjectKind::Board => 11,
            ObjectKind::Topic => 12,
            ObjectKind::Post => 13,
            ObjectKind::WikiRevision => 14,
            ObjectKind::MergeJob => 15,
            ObjectKind::MergeJobPostRef => 16,
            ObjectKind::ContributionCredit => 17,
            ObjectKind::DocLink => 18,
            ObjectKind::TopicVote => 19,
            ObjectKind::PostVote => 20,
            ObjectKind::TopicSolution => 21,
        }
    }

    /// Table holding rows of this kind.
    pub const fn table(self) -> &'static str {
        match self {
            ObjectKind::Board => "boards",
            ObjectKind::Topic => "topics",
            ObjectKind::Post => "posts",
            ObjectKind::WikiRevision => "wiki_revisions",
            ObjectKind::MergeJob => "merge_jobs",
            ObjectKind::MergeJobPostRef => "merge_job_post_refs",
            ObjectKind::ContributionCredit => "contribution_credits",
            ObjectKind::DocLink => "doc_links",
            ObjectKind::TopicVote => "topic_votes",
            ObjectKind::PostVote => "post_votes",
            ObjectKind::TopicSolution => "topic_solutions",
        }
    }

    pub fn from_tag(tag: u16) -> Option<ObjectKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Format a sequence value allocated for `kind` as an identifier.
pub fn format_object_id(kind: ObjectKind, sequence: i64) -> Result<ObjectId, CoreError> {
    if !(1..=MAX_SEQUENCE).contains(&sequence) {
        return Err(CoreError::Internal(format!(
            "Sequence {sequence} for {} is outside the identifier range",
            kind.table()
        )));
    }
    Ok(format!("1{:03}{:013}", kind.tag(), sequence))
}

/// Split an identifier back into its kind and sequence.
///
/// Returns `None` for anything not produced by [`format_object_id`].
pub fn parse_object_id(id: &str) -> Option<(ObjectKind, i64)> {
    if id.len() != OBJECT_ID_LEN || !id.starts_with('1') {
        return None;
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let tag: u16 = id[1..4].parse().ok()?;
    let sequence: i64 = id[4..].parse().ok()?;
    Some((ObjectKind::from_tag(tag)?, sequence))
}
