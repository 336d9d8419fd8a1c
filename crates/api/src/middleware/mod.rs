//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireModerator`] -- Requires the `admin` or `moderator` role.

pub mod auth;
pub mod rbac;
