//! Role-based access control extractors.
//!
//! The service re-checks roles on every elevated operation; these
//! extractors reject earlier, before the request body is read.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `admin` or `moderator` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn moderate(RequireModerator(user): RequireModerator) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireModerator(pub AuthUser);

impl FromRequestParts<AppState> for RequireModerator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.caller.require_admin_or_moderator()?;
        Ok(RequireModerator(user))
    }
}
