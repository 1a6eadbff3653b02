//! Error taxonomy for storage operations.
//!
//! Every failure coming out of SQLite is classified so that callers can tell
//! a retryable transport problem (busy, locked, I/O) from a permanent rejection
//! of the input (unique or foreign key violation, trigger abort).

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, lock or I/O failure. The whole operation may be retried.
    #[error("storage temporarily unavailable: {0}")]
    Transient(#[source] rusqlite::Error),

    /// The input was rejected by a schema constraint. Retrying will not help.
    #[error("constraint violation: {0}")]
    Constraint(#[source] rusqlite::Error),

    /// A team id that cannot reference an existing team was supplied.
    #[error("invalid team id {0}")]
    InvalidTeam(i32),

    /// A generated row id does not fit the 32-bit ids used throughout.
    #[error("row id {0} does not fit a 32-bit id")]
    IdOutOfRange(i64),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error(transparent)]
    Other(rusqlite::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::CannotOpen
                | ErrorCode::OperationInterrupted
                | ErrorCode::DiskFull
                | ErrorCode::FileLockingProtocolFailed,
            ) => StoreError::Transient(err),
            Some(ErrorCode::ConstraintViolation) => StoreError::Constraint(err),
            _ => StoreError::Other(err),
        }
    }
}

/// Returned when a stored or typed enum code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite_failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn busy_and_locked_are_retryable() {
        assert!(StoreError::from(sqlite_failure(ffi::SQLITE_BUSY)).is_retryable());
        assert!(StoreError::from(sqlite_failure(ffi::SQLITE_LOCKED)).is_retryable());
        assert!(StoreError::from(sqlite_failure(ffi::SQLITE_IOERR)).is_retryable());
    }

    #[test]
    fn constraint_failures_are_permanent() {
        let err = StoreError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT_FOREIGNKEY));
        assert!(err.is_constraint());
        assert!(!err.is_retryable());

        let err = StoreError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT_PRIMARYKEY));
        assert!(err.is_constraint());
    }

    #[test]
    fn other_errors_fall_through() {
        let err = StoreError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StoreError::Other(_)));
        assert!(!StoreError::InvalidTeam(0).is_retryable());
    }

    #[test]
    fn id_out_of_range_is_permanent() {
        let err = StoreError::IdOutOfRange(2_147_483_648);
        assert!(!err.is_retryable());
        assert!(!err.is_constraint());
        assert_eq!(err.to_string(), "row id 2147483648 does not fit a 32-bit id");
    }
}
