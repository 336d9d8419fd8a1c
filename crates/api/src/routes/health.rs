use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable or behind.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered a ping.
    pub db_healthy: bool,
    /// Newest migration applied to the database.
    pub schema_version: Option<i64>,
    /// Whether `schema_version` matches the newest migration in this build.
    pub schema_current: bool,
}

/// GET /health -- service, database and schema health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = quire_db::health_check(&state.pool).await.is_ok();
    let schema_version = if db_healthy {
        quire_db::schema_version(&state.pool)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Could not read schema version");
                None
            })
    } else {
        None
    };
    let schema_current = schema_version.is_some() && schema_version == quire_db::latest_migration();

    let status = if db_healthy && schema_current { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema_version,
        schema_current,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
