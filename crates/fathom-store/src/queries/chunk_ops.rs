//! Chunk row inserts and lookups.

use rusqlite::{params, Connection};
use tracing::warn;

use fathom_core::errors::FathomResult;
use fathom_core::traits::{EmbedKind, IEmbeddingProvider};
use fathom_core::{Chunk, StoredChunk};

use crate::queries::vector_search::vector_to_blob;
use crate::{from_sqlite, to_storage_err};

/// Insert a chunk batch atomically, returning the assigned row ids in
/// input order. When an embedding provider is supplied, each chunk also
/// gets an embedding row; per-chunk embedding failures are logged and
/// the chunk row is kept without a vector.
pub fn insert_batch(
    conn: &Connection,
    chunks: &[Chunk],
    embedder: Option<&dyn IEmbeddingProvider>,
) -> FathomResult<Vec<i64>> {
    conn.execute_batch("SAVEPOINT insert_chunks")
        .map_err(|e| to_storage_err(format!("insert_chunks savepoint: {e}")))?;

    match insert_batch_inner(conn, chunks, embedder) {
        Ok(ids) => {
            conn.execute_batch("RELEASE insert_chunks")
                .map_err(|e| to_storage_err(format!("insert_chunks release: {e}")))?;
            Ok(ids)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO insert_chunks");
            let _ = conn.execute_batch("RELEASE insert_chunks");
            warn!(%e, "chunk batch rolled back");
            Err(e)
        }
    }
}

fn insert_batch_inner(
    conn: &Connection,
    chunks: &[Chunk],
    embedder: Option<&dyn IEmbeddingProvider>,
) -> FathomResult<Vec<i64>> {
    let mut chunk_stmt = conn
        .prepare("INSERT INTO chunks(doc_id, seq_no, topic, content) VALUES (?1, ?2, ?3, ?4)")
        .map_err(from_sqlite)?;
    let mut embedding_stmt = conn
        .prepare("INSERT INTO embeddings(chunk_id, vector) VALUES (?1, ?2)")
        .map_err(from_sqlite)?;

    let mut ids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        chunk_stmt
            .execute(params![chunk.doc_id, chunk.seq_no, chunk.topic, chunk.text])
            .map_err(from_sqlite)?;
        let chunk_id = conn.last_insert_rowid();
        ids.push(chunk_id);

        if let Some(embedder) = embedder {
            match embedder.embed(&chunk.text, EmbedKind::Document) {
                Ok(vector) if !vector.is_empty() => {
                    embedding_stmt
                        .execute(params![chunk_id, vector_to_blob(&vector)])
                        .map_err(from_sqlite)?;
                }
                Ok(_) => {
                    warn!(doc_id = %chunk.doc_id, seq_no = chunk.seq_no, "empty embedding, chunk stored without vector");
                }
                Err(error) => {
                    warn!(doc_id = %chunk.doc_id, seq_no = chunk.seq_no, %error, "embedding failed, chunk stored without vector");
                }
            }
        }
    }
    Ok(ids)
}

/// Fetch rows by chunk id. Output follows database order; callers that
/// need a specific order re-sort by id.
pub fn chunks_by_ids(conn: &Connection, chunk_ids: &[i64]) -> FathomResult<Vec<StoredChunk>> {
    if chunk_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; chunk_ids.len()].join(",");
    let sql = format!(
        "SELECT id, doc_id, seq_no, topic, content FROM chunks WHERE id IN ({placeholders})"
    );
    let mut stmt = conn.prepare(&sql).map_err(from_sqlite)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(chunk_ids.iter()), |row| {
            super::parse_chunk_row(row, 1.0)
        })
        .map_err(from_sqlite)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(from_sqlite)?);
    }
    Ok(results)
}

/// Fetch all rows of a document, ordered by sequence number. Used by
/// hot promotion into the memory tier.
pub fn chunks_by_doc_id(conn: &Connection, doc_id: &str) -> FathomResult<Vec<StoredChunk>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, doc_id, seq_no, topic, content FROM chunks
             WHERE doc_id = ?1 ORDER BY seq_no",
        )
        .map_err(from_sqlite)?;
    let rows = stmt
        .query_map(params![doc_id], |row| super::parse_chunk_row(row, 1.0))
        .map_err(from_sqlite)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(from_sqlite)?);
    }
    Ok(results)
}
