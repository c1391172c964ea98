//! Corpus-wide maintenance: clear-all and statistics.

use rusqlite::Connection;

use fathom_core::errors::FathomResult;

use crate::engine::StoreStats;
use crate::{from_sqlite, to_storage_err};

/// Delete every chunk, FTS entry, and embedding in one transaction,
/// then reclaim file space.
pub fn clear_all(conn: &Connection, fts_enabled: bool) -> FathomResult<()> {
    conn.execute_batch("SAVEPOINT clear_all")
        .map_err(|e| to_storage_err(format!("clear_all savepoint: {e}")))?;

    let result = (|| -> FathomResult<()> {
        conn.execute_batch("DELETE FROM embeddings").map_err(from_sqlite)?;
        if fts_enabled {
            conn.execute_batch("INSERT INTO chunks_fts(chunks_fts) VALUES('delete-all')")
                .map_err(from_sqlite)?;
        }
        conn.execute_batch("DELETE FROM chunks").map_err(from_sqlite)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            conn.execute_batch("RELEASE clear_all")
                .map_err(|e| to_storage_err(format!("clear_all release: {e}")))?;
            // VACUUM cannot run inside a transaction.
            conn.execute_batch("VACUUM").map_err(from_sqlite)?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO clear_all");
            let _ = conn.execute_batch("RELEASE clear_all");
            Err(e)
        }
    }
}

/// Corpus statistics snapshot.
pub fn stats(conn: &Connection) -> FathomResult<StoreStats> {
    let total_chunks: i64 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(from_sqlite)?;
    let total_embeddings: i64 = conn
        .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))
        .map_err(from_sqlite)?;
    let db_size_bytes: f64 = conn
        .query_row(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
            [],
            |row| row.get(0),
        )
        .map_err(from_sqlite)?;
    let last_update: Option<String> = conn
        .query_row("SELECT MAX(created_at) FROM chunks", [], |row| row.get(0))
        .map_err(from_sqlite)?;

    Ok(StoreStats {
        total_chunks: total_chunks as usize,
        total_embeddings: total_embeddings as usize,
        db_size_mb: db_size_bytes / (1024.0 * 1024.0),
        last_update,
    })
}
