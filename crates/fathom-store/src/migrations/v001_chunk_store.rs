//! v001: Owning chunk table plus auxiliary indexes.

use rusqlite::Connection;

use fathom_core::errors::FathomResult;

use crate::from_sqlite;

pub fn migrate(conn: &Connection) -> FathomResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chunks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id      TEXT NOT NULL,
            seq_no      INTEGER NOT NULL,
            topic       TEXT,
            content     TEXT NOT NULL,
            created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_doc_id ON chunks(doc_id);
        CREATE INDEX IF NOT EXISTS idx_chunks_topic ON chunks(topic);
        CREATE INDEX IF NOT EXISTS idx_chunks_created ON chunks(created_at);
        ",
    )
    .map_err(from_sqlite)?;
    Ok(())
}
