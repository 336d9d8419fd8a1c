use quire_core::error::CoreError;

/// Failure of a repository operation that evaluates domain rules inside its
/// transaction.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RepoError {
    /// Whether restarting the whole unit of work may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RepoError::Database(err) => crate::retry::is_transient(err),
            RepoError::Core(_) => false,
        }
    }
}
