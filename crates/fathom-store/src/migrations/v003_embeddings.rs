//! v003: Embedding blob table, one fixed-dimension vector per chunk.
//!
//! Vectors are IEEE-754 single-precision little-endian, `4 * dim` bytes.
//! Rows cascade away with their owning chunk.

use rusqlite::Connection;

use fathom_core::errors::FathomResult;

use crate::from_sqlite;

pub fn migrate(conn: &Connection) -> FathomResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS embeddings (
            chunk_id  INTEGER PRIMARY KEY,
            vector    BLOB NOT NULL,
            FOREIGN KEY(chunk_id) REFERENCES chunks(id) ON DELETE CASCADE
        );
        ",
    )
    .map_err(from_sqlite)?;
    Ok(())
}
