//! Numbered schema migrations tracked in `schema_version`.

mod v001_chunk_store;
mod v002_fts_index;
mod v003_embeddings;

use rusqlite::{params, Connection};
use tracing::debug;

use fathom_core::errors::{FathomResult, StorageError};

use crate::from_sqlite;

const MIGRATIONS: &[(u32, fn(&Connection) -> FathomResult<()>)] = &[
    (1, v001_chunk_store::migrate),
    (2, v002_fts_index::migrate),
    (3, v003_embeddings::migrate),
];

/// Apply any migrations newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> FathomResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(from_sqlite)?;

    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(from_sqlite)?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.execute("INSERT INTO schema_version(version) VALUES (?1)", params![version])
            .map_err(from_sqlite)?;
        debug!(version, "applied schema migration");
    }
    Ok(())
}
