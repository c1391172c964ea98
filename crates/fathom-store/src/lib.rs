//! # fathom-store
//!
//! Persistent retrieval tier backed by an embedded SQLite database:
//! an owning chunk table, an FTS5 full-text index over chunk content,
//! and an embedding blob table for vector search. One writer at a time;
//! readers proceed concurrently under WAL.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;

pub use engine::{StoreEngine, StoreStats, VectorCapability};

use fathom_core::errors::{FathomError, StorageError};

/// Wrap a driver message into the storage taxonomy.
pub(crate) fn to_storage_err(message: String) -> FathomError {
    StorageError::Sqlite { message }.into()
}

/// Map a rusqlite error, distinguishing busy-timeout exhaustion so
/// callers can retry transient failures.
pub(crate) fn from_sqlite(error: rusqlite::Error) -> FathomError {
    match &error {
        rusqlite::Error::SqliteFailure(inner, _)
            if matches!(
                inner.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            StorageError::Busy {
                message: error.to_string(),
            }
            .into()
        }
        _ => StorageError::Sqlite {
            message: error.to_string(),
        }
        .into(),
    }
}
