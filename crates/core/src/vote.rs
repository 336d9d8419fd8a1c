//! Vote values and the counter delta rule.

use serde::Serialize;

use crate::error::CoreError;

/// A single user's vote on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub enum VoteValue {
    Down = -1,
    Up = 1,
}

impl VoteValue {
    pub const fn as_i64(self) -> i64 {
        self as i64
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        value.as_i64()
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(CoreError::Validation(format!(
                "Vote value must be 1 or -1, got {other}"
            ))),
        }
    }
}

/// Change to a target's cached counter when a user's vote moves from
/// `previous` to `next`.
pub fn vote_delta(previous: Option<VoteValue>, next: VoteValue) -> i64 {
    next.as_i64() - previous.map_or(0, VoteValue::as_i64)
}
