//! FTS5 full-text search with BM25 scoring.

use rusqlite::{params, Connection};

use fathom_core::errors::FathomResult;
use fathom_core::StoredChunk;

use crate::from_sqlite;

/// Run an FTS5 match ranked by BM25 relevance.
///
/// SQLite's `bm25()` is signed with more-negative = more relevant, so
/// results are ordered by `rank` and the raw score is converted to the
/// positive convention with the monotone calibration `|s| / (1 + |s|)`.
pub fn search_fts(conn: &Connection, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.doc_id, c.seq_no, c.topic, c.content, bm25(chunks_fts) AS score
             FROM chunks_fts
             JOIN chunks c ON chunks_fts.rowid = c.id
             WHERE chunks_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )
        .map_err(from_sqlite)?;

    let rows = stmt
        .query_map(params![query, limit as i64], |row| {
            let raw: f64 = row.get(5)?;
            super::parse_chunk_row(row, positive_score(raw))
        })
        .map_err(from_sqlite)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(from_sqlite)?);
    }
    Ok(results)
}

/// Rebuild the external-content FTS index after a committed batch.
pub fn rebuild_index(conn: &Connection) -> FathomResult<()> {
    conn.execute_batch("INSERT INTO chunks_fts(chunks_fts) VALUES('rebuild')")
        .map_err(from_sqlite)?;
    Ok(())
}

/// Monotone positive calibration of the signed BM25 score, in `[0, 1)`.
fn positive_score(raw: f64) -> f64 {
    raw.abs() / (1.0 + raw.abs())
}
