//! Well-known role names and the authenticated caller.
//!
//! Roles arrive in the identity token; they are not stored by this service.

use crate::error::CoreError;
use crate::types::ObjectId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_USER: &str = "user";

/// The authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: ObjectId,
    pub role: String,
}

impl Caller {
    pub fn new(user_id: impl Into<ObjectId>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
        }
    }

    /// Administrators and moderators may create boards and review/apply merges.
    pub fn is_admin_or_moderator(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_MODERATOR
    }

    /// Reject the call unless the caller holds an elevated role.
    pub fn require_admin_or_moderator(&self) -> Result<(), CoreError> {
        if self.is_admin_or_moderator() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Admin or Moderator role required".into(),
            ))
        }
    }
}
