/// Failure kinds surfaced by repository operations.
///
/// Store errors are never retried here; they propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("foreign key constraint violated: {0}")]
    Constraint(String),

    #[error("store unavailable: {0}")]
    Io(sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DbError::Constraint(db_err.message().to_string());
            }
        }
        DbError::Io(err)
    }
}
