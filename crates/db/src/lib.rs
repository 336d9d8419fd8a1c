//! SQLite persistence for boards, topics, posts, wiki revisions, merge jobs,
//! votes, solutions and document links.
//!
//! Repositories are zero-sized structs whose methods take `&DbPool`.
//! Multi-statement operations run inside one transaction and are restarted
//! as a whole when they lose a lock race (see [`retry`]).

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

pub mod error;
pub mod models;
pub mod repositories;
pub mod retry;

pub use error::RepoError;

pub type DbPool = sqlx::SqlitePool;

/// How long a connection waits on a locked database before failing busy.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool from a `sqlite://` URL.
///
/// Every connection runs in WAL mode with foreign keys enforced and a
/// [`BUSY_TIMEOUT`] lock wait. The database file is created if missing.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    create_pool_with(database_url, max_connections, BUSY_TIMEOUT).await
}

/// [`create_pool`] with an explicit lock wait.
///
/// With a zero `busy_timeout` SQLite reports `SQLITE_BUSY` at once and lock
/// contention is handled by [`retry::with_retry`] alone.
pub async fn create_pool_with(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(busy_timeout)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Cheap round trip proving the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Version of the newest migration compiled into this binary.
pub fn latest_migration() -> Option<i64> {
    MIGRATOR.iter().map(|migration| migration.version).max()
}

/// Version of the newest migration successfully applied to the database,
/// or `None` on an empty one.
pub async fn schema_version(pool: &DbPool) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
}
