//! Custom error types for the common library
//!
//! This module defines the error types shared by every crate that talks to
//! the relational store.

use sqlx::Error as SqlxError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Custom error type for database lifecycle operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Failures reported by store operations
///
/// Absence is usually expressed as `Ok(None)`; `NotFound` is only produced
/// when an operation needs a row that turned out not to exist.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested row does not exist
    #[error("Record not found")]
    NotFound,

    /// A unique index rejected the write (username, email, follow pair)
    #[error("Unique constraint violation: {0}")]
    UniqueConstraintViolation(String),

    /// A referenced row does not exist
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A user tried to follow themselves
    #[error("A user cannot follow themselves")]
    SelfFollow,

    /// The store could not be reached (pool closed, timed out, I/O)
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] SqlxError),

    /// Any other error reported by the driver
    #[error("Store query error: {0}")]
    Query(#[source] SqlxError),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return StoreError::UniqueConstraintViolation(message),
                ErrorKind::ForeignKeyViolation => return StoreError::ForeignKeyViolation(message),
                _ => {}
            }
        }

        match err {
            SqlxError::RowNotFound => StoreError::NotFound,
            SqlxError::PoolClosed | SqlxError::PoolTimedOut | SqlxError::Io(_) => {
                StoreError::StoreUnavailable(err)
            }
            other => StoreError::Query(other),
        }
    }
}
