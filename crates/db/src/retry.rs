//! Classification of SQLite lock contention and the retry wrapper used by
//! the identifier generator and every write unit.

use std::future::Future;

use quire_core::retry::{retry_transient, RetryPolicy};

use crate::error::RepoError;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Whether the error is SQLite reporting a busy or locked database.
///
/// Extended result codes (e.g. `SQLITE_BUSY_SNAPSHOT` = 517) are folded to
/// their primary code.
pub fn is_transient(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    if let Some(code) = db_err.code().and_then(|c| c.parse::<i32>().ok()) {
        let primary = code & 0xff;
        if primary == SQLITE_BUSY || primary == SQLITE_LOCKED {
            return true;
        }
    }
    let message = db_err.message();
    message.contains("database is locked") || message.contains("database table is locked")
}

/// Errors that can say whether a restart of the failed unit may succeed.
pub trait Transient: std::fmt::Display {
    fn is_transient(&self) -> bool;
}

impl Transient for sqlx::Error {
    fn is_transient(&self) -> bool {
        is_transient(self)
    }
}

impl Transient for RepoError {
    fn is_transient(&self) -> bool {
        RepoError::is_transient(self)
    }
}

/// Run `op` under [`RetryPolicy::STORAGE`], restarting it on busy/locked.
///
/// `op` must be a complete unit of work: a failed attempt has to leave no
/// trace (its transaction is dropped, hence rolled back).
pub async fn with_retry<T, E, F, Fut>(op: F) -> Result<T, E>
where
    E: Transient,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_transient(&RetryPolicy::STORAGE, E::is_transient, op).await
}
