//! v002: External-content FTS5 index over chunk content.
//!
//! No sync triggers: batches are indexed with an explicit 'rebuild'
//! command after each committed insert.

use rusqlite::Connection;

use fathom_core::errors::FathomResult;

use crate::from_sqlite;

pub fn migrate(conn: &Connection) -> FathomResult<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS chunks_fts USING fts5(
            content,
            content='chunks',
            content_rowid='id',
            tokenize='unicode61 remove_diacritics 1'
        );
        ",
    )
    .map_err(from_sqlite)?;
    Ok(())
}
