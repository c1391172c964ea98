//! Error taxonomy for the fathom workspace.
//!
//! One enum per subsystem, aggregated into [`FathomError`]. Component
//! boundaries return structured failures; the public query path never
//! panics on data errors — an empty ranked list is a legitimate answer.

mod embedding_error;
mod index_error;
mod retrieval_error;
mod storage_error;

pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;

/// Unified error type crossing crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum FathomError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("configuration error: {reason}")]
    Config { reason: String },
}

pub type FathomResult<T> = Result<T, FathomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_errors_convert_via_from() {
        let err: FathomError = StorageError::Sqlite {
            message: "disk I/O error".into(),
        }
        .into();
        assert!(matches!(err, FathomError::Storage(_)));

        let err: FathomError = RetrievalError::EmptyQuery.into();
        assert_eq!(err.to_string(), "empty query");
    }

    #[test]
    fn messages_carry_context() {
        let err = StorageError::MigrationFailed {
            version: 2,
            reason: "no such table".into(),
        };
        assert!(err.to_string().contains("version 2"));
    }
}
