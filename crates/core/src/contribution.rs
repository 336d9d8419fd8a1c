//! Contribution-credit policy for applied merges.
//!
//! One credit per merged post, not per author: an author with two merged
//! posts gets two rows. Readers sum by user.

use serde::Serialize;

use crate::types::ObjectId;

/// Weight used when the request supplies none (or a non-positive one).
pub const DEFAULT_CONTRIBUTION_WEIGHT: i64 = 1;

pub fn normalize_weight(requested: i64) -> i64 {
    if requested <= 0 {
        DEFAULT_CONTRIBUTION_WEIGHT
    } else {
        requested
    }
}

/// A credit to be written for one merged post's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditShare {
    pub user_id: ObjectId,
    pub weight: i64,
}

/// One share per author entry, in input order, all with the normalized weight.
pub fn distribute_credits<I, S>(post_authors: I, requested_weight: i64) -> Vec<CreditShare>
where
    I: IntoIterator<Item = S>,
    S: Into<ObjectId>,
{
    let weight = normalize_weight(requested_weight);
    post_authors
        .into_iter()
        .map(|user_id| CreditShare {
            user_id: user_id.into(),
            weight,
        })
        .collect()
}
