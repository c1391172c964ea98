/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("failed to open database at {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("transaction failed: {reason}")]
    TransactionFailed { reason: String },

    /// Busy-timeout exhausted; the caller may retry.
    #[error("database busy: {message}")]
    Busy { message: String },
}
