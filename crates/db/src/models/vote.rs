//! Vote models and DTOs, shared by topic and post votes.

use quire_core::types::ObjectId;
use serde::{Deserialize, Serialize};

/// DTO for casting a vote. `value` must be 1 or -1.
#[derive(Debug, Deserialize)]
pub struct CastVote {
    pub value: i64,
}

/// What a vote upsert did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub target_id: ObjectId,
    pub value: i64,
    /// Change applied to the target's cached counter (0 for a repeat vote).
    pub delta: i64,
    /// The target's counter after the upsert.
    pub vote_count: i64,
}
