use crate::types::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: ObjectId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A merge-job action was attempted from a state that does not allow it.
    #[error("Cannot {action} a merge job in status '{status}'")]
    InvalidTransition {
        status: &'static str,
        action: &'static str,
    },

    /// The merge job was already applied with a different revision.
    #[error("Merge job already applied with revision {applied_revision_id}")]
    AlreadyApplied { applied_revision_id: ObjectId },

    #[error("A non-empty revision id is required")]
    RevisionRequired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<ObjectId>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
