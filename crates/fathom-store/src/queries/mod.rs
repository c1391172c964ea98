//! SQL building blocks used by the store engine. Each function takes a
//! borrowed connection so callers decide which pool side it runs on.

pub mod chunk_ops;
pub mod fts_search;
pub mod hybrid;
pub mod maintenance;
pub mod vector_search;

use rusqlite::Row;

use fathom_core::StoredChunk;

/// Parse the common `(id, doc_id, seq_no, topic, content)` column prefix.
pub(crate) fn parse_chunk_row(row: &Row<'_>, score: f64) -> rusqlite::Result<StoredChunk> {
    Ok(StoredChunk {
        chunk_id: row.get(0)?,
        doc_id: row.get(1)?,
        seq_no: row.get::<_, i64>(2)? as u32,
        topic: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        content: row.get(4)?,
        score,
    })
}
