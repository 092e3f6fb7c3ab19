//! Database error types for wdn-db.

use thiserror::Error;

/// Errors from database operations and the allocation engine.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An allocation run is already in progress; whole runs are
    /// single-flight to keep room occupancy increments serialized.
    #[error("An allocation run is already in progress")]
    RunInProgress,

    /// Core domain error (invariant violation, invalid transition).
    #[error(transparent)]
    Core(#[from] wdn_core::errors::CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
