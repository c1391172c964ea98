use serde::{Deserialize, Serialize};

use super::defaults;

/// Persistent SQLite store configuration (the `[sqlite]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the database file.
    pub db_path: String,
    /// Vector capability selector: `""` or `"scan"` for the built-in
    /// brute-force scan, otherwise a loadable extension path.
    pub vector_extension: String,
    /// Fixed embedding dimension; blobs are `4 * vector_dimension` bytes.
    pub vector_dimension: usize,
    pub enable_fts5: bool,
    pub enable_wal: bool,
    /// Page cache size passed straight to `PRAGMA cache_size`.
    pub cache_size: i64,
    pub busy_timeout: u32,
    /// Candidate count for the FTS side of a hybrid search.
    pub fts5_limit: usize,
    /// Candidate count for the vector side of a hybrid search.
    pub vector_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_PATH.to_string(),
            vector_extension: defaults::DEFAULT_VECTOR_EXTENSION.to_string(),
            vector_dimension: defaults::DEFAULT_VECTOR_DIMENSION,
            enable_fts5: defaults::DEFAULT_ENABLE_FTS5,
            enable_wal: defaults::DEFAULT_ENABLE_WAL,
            cache_size: defaults::DEFAULT_SQLITE_CACHE_SIZE,
            busy_timeout: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            fts5_limit: defaults::DEFAULT_FTS5_LIMIT,
            vector_limit: defaults::DEFAULT_VECTOR_LIMIT,
        }
    }
}

impl StoreConfig {
    /// Whether vector search uses the built-in blob scan (no extension
    /// load attempted).
    pub fn uses_builtin_scan(&self) -> bool {
        self.vector_extension.is_empty() || self.vector_extension == "scan"
    }
}
