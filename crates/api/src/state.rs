use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::ForumService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and service are handles, the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quire_db::DbPool,
    /// Server configuration (read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Forum orchestration over the repositories.
    pub forum: ForumService,
}

impl AppState {
    pub fn new(pool: quire_db::DbPool, config: ServerConfig) -> Self {
        Self {
            forum: ForumService::new(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}
