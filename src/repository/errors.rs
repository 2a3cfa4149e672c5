use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Failed to obtain a connection from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// The underlying database reported a failure or constraint violation.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// A stored row violated a domain type constraint.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Whether this error is a foreign-key violation, e.g. an association
    /// referencing a color id that does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            RepositoryError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _,
            ))
        )
    }
}
