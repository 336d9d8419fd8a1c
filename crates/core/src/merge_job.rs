//! Merge-job lifecycle: `pending -> reviewed -> applied`.
//!
//! The state is a closed enum whose variants carry exactly the data that is
//! valid in that state, so an applied job without a revision (or a reviewed
//! job without a reviewer) cannot be constructed. Rows are turned into a
//! [`MergeJobAggregate`] with [`MergeJobAggregate::from_parts`] for the
//! duration of one operation, mutated through the guarded transitions, and
//! written back with [`MergeJobAggregate::status`] and the accessors.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ObjectId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Persisted status column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeJobStatus {
    Pending,
    Reviewed,
    Applied,
}

impl MergeJobStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Applied => "applied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "applied" => Some(Self::Applied),
            _ => None,
        }
    }
}

impl std::fmt::Display for MergeJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeJobState {
    Pending,
    Reviewed {
        reviewer_id: ObjectId,
    },
    Applied {
        reviewer_id: ObjectId,
        revision_id: ObjectId,
    },
}

/// Outcome of [`MergeJobAggregate::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The job moved from `reviewed` to `applied`.
    Transitioned,
    /// The job was already applied with the same revision; nothing changed.
    Replayed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJobAggregate {
    pub id: ObjectId,
    state: MergeJobState,
}

impl MergeJobAggregate {
    /// A freshly proposed job.
    pub fn new(id: impl Into<ObjectId>) -> Self {
        Self {
            id: id.into(),
            state: MergeJobState::Pending,
        }
    }

    /// Rebuild the aggregate from persisted columns.
    ///
    /// Rejects unknown status values and rows whose columns contradict their
    /// status (e.g. `applied` with no revision).
    pub fn from_parts(
        id: impl Into<ObjectId>,
        status: &str,
        reviewer_id: Option<&str>,
        applied_revision_id: Option<&str>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_owned);

        let state = match MergeJobStatus::parse(status) {
            Some(MergeJobStatus::Pending) => MergeJobState::Pending,
            Some(MergeJobStatus::Reviewed) => MergeJobState::Reviewed {
                reviewer_id: non_empty(reviewer_id).ok_or_else(|| corrupt(&id, status))?,
            },
            Some(MergeJobStatus::Applied) => MergeJobState::Applied {
                reviewer_id: non_empty(reviewer_id).ok_or_else(|| corrupt(&id, status))?,
                revision_id: non_empty(applied_revision_id)
                    .ok_or_else(|| corrupt(&id, status))?,
            },
            None => {
                return Err(CoreError::Internal(format!(
                    "Merge job {id} has unknown status '{status}'"
                )))
            }
        };
        Ok(Self { id, state })
    }

    pub fn state(&self) -> &MergeJobState {
        &self.state
    }

    pub fn status(&self) -> MergeJobStatus {
        match self.state {
            MergeJobState::Pending => MergeJobStatus::Pending,
            MergeJobState::Reviewed { .. } => MergeJobStatus::Reviewed,
            MergeJobState::Applied { .. } => MergeJobStatus::Applied,
        }
    }

    pub fn reviewer_id(&self) -> Option<&str> {
        match &self.state {
            MergeJobState::Pending => None,
            MergeJobState::Reviewed { reviewer_id }
            | MergeJobState::Applied { reviewer_id, .. } => Some(reviewer_id),
        }
    }

    pub fn applied_revision_id(&self) -> Option<&str> {
        match &self.state {
            MergeJobState::Applied { revision_id, .. } => Some(revision_id),
            _ => None,
        }
    }

    /// `pending -> reviewed`, recording the reviewer.
    pub fn mark_reviewed(&mut self, reviewer_id: impl Into<ObjectId>) -> Result<(), CoreError> {
        match self.state {
            MergeJobState::Pending => {
                self.state = MergeJobState::Reviewed {
                    reviewer_id: reviewer_id.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid("review")),
        }
    }

    /// `reviewed -> applied` with the given revision.
    ///
    /// Re-applying an applied job with its recorded revision is a no-op;
    /// any other revision is rejected with [`CoreError::AlreadyApplied`].
    /// The applier becomes the recorded reviewer.
    pub fn apply(
        &mut self,
        revision_id: &str,
        applier_id: impl Into<ObjectId>,
    ) -> Result<ApplyOutcome, CoreError> {
        if revision_id.is_empty() {
            return Err(CoreError::RevisionRequired);
        }
        match &self.state {
            MergeJobState::Applied {
                revision_id: applied,
                ..
            } => {
                if applied == revision_id {
                    Ok(ApplyOutcome::Replayed)
                } else {
                    Err(CoreError::AlreadyApplied {
                        applied_revision_id: applied.clone(),
                    })
                }
            }
            MergeJobState::Reviewed { .. } => {
                self.state = MergeJobState::Applied {
                    reviewer_id: applier_id.into(),
                    revision_id: revision_id.to_owned(),
                };
                Ok(ApplyOutcome::Transitioned)
            }
            MergeJobState::Pending => Err(self.invalid("apply")),
        }
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            status: self.status().as_str(),
            action,
        }
    }
}

fn corrupt(id: &str, status: &str) -> CoreError {
    CoreError::Internal(format!(
        "Merge job {id} in status '{status}' is missing required columns"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn reviewed() -> MergeJobAggregate {
        let mut job = MergeJobAggregate::new("job");
        job.mark_reviewed("mod").unwrap();
        job
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = MergeJobAggregate::new("job");
        assert_eq!(job.status(), MergeJobStatus::Pending);
        assert_eq!(job.reviewer_id(), None);
        assert_eq!(job.applied_revision_id(), None);
    }

    #[test]
    fn test_full_path_records_reviewer_and_revision() {
        let mut job = reviewed();
        assert_eq!(job.status(), MergeJobStatus::Reviewed);
        assert_eq!(job.reviewer_id(), Some("mod"));

        assert_eq!(job.apply("rev-1", "admin").unwrap(), ApplyOutcome::Transitioned);
        assert_eq!(job.status(), MergeJobStatus::Applied);
        assert_eq!(job.applied_revision_id(), Some("rev-1"));
        assert_eq!(job.reviewer_id(), Some("admin"));
    }

    #[test]
    fn test_review_only_from_pending() {
        let mut job = reviewed();
        assert_matches!(
            job.mark_reviewed("other"),
            Err(CoreError::InvalidTransition { status: "reviewed", action: "review" })
        );

        job.apply("rev-1", "mod").unwrap();
        assert_matches!(
            job.mark_reviewed("other"),
            Err(CoreError::InvalidTransition { status: "applied", .. })
        );
        assert_eq!(job.applied_revision_id(), Some("rev-1"));
    }

    #[test]
    fn test_apply_from_pending_is_rejected() {
        let mut job = MergeJobAggregate::new("job");
        assert_matches!(
            job.apply("rev-1", "mod"),
            Err(CoreError::InvalidTransition { status: "pending", action: "apply" })
        );
        assert_eq!(job.status(), MergeJobStatus::Pending);
    }

    #[test]
    fn test_apply_requires_revision() {
        let mut job = reviewed();
        assert_matches!(job.apply("", "mod"), Err(CoreError::RevisionRequired));
        assert_eq!(job.status(), MergeJobStatus::Reviewed);

        job.apply("rev-1", "mod").unwrap();
        assert_matches!(job.apply("", "mod"), Err(CoreError::RevisionRequired));
    }

    #[test]
    fn test_reapply_same_revision_is_noop() {
        let mut job = reviewed();
        job.apply("rev-1", "mod").unwrap();
        let before = job.clone();

        assert_eq!(job.apply("rev-1", "someone-else").unwrap(), ApplyOutcome::Replayed);
        assert_eq!(job, before);
    }

    #[test]
    fn test_reapply_different_revision_conflicts() {
        let mut job = reviewed();
        job.apply("rev-1", "mod").unwrap();
        let before = job.clone();

        let err = job.apply("rev-2", "mod").unwrap_err();
        assert_matches!(
            err,
            CoreError::AlreadyApplied { ref applied_revision_id } if applied_revision_id == "rev-1"
        );
        assert_eq!(job, before);
    }

    #[test]
    fn test_from_parts_round_trips_each_state() {
        let pending = MergeJobAggregate::from_parts("j", "pending", None, None).unwrap();
        assert_eq!(pending.state(), &MergeJobState::Pending);

        let reviewed = MergeJobAggregate::from_parts("j", "reviewed", Some("u"), None).unwrap();
        assert_eq!(reviewed.reviewer_id(), Some("u"));

        let applied =
            MergeJobAggregate::from_parts("j", "applied", Some("u"), Some("r")).unwrap();
        assert_eq!(applied.applied_revision_id(), Some("r"));
    }

    #[test]
    fn test_from_parts_rejects_corrupt_rows() {
        assert_matches!(
            MergeJobAggregate::from_parts("j", "merged", None, None),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            MergeJobAggregate::from_parts("j", "applied", Some("u"), Some("")),
            Err(CoreError::Internal(_))
        );
        assert_matches!(
            MergeJobAggregate::from_parts("j", "reviewed", None, None),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn test_status_strings() {
        for status in [
            MergeJobStatus::Pending,
            MergeJobStatus::Reviewed,
            MergeJobStatus::Applied,
        ] {
            assert_eq!(MergeJobStatus::parse(status.as_str()), Some(status));
        }
    }
}
