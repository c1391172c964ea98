//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL (or DELETE) journal per config, NORMAL sync, configured page
//! cache, in-memory temp store, 256MB mmap, busy timeout from config,
//! foreign_keys ON for cascaded embedding deletes.

use rusqlite::Connection;

use fathom_core::config::defaults::DEFAULT_MMAP_SIZE;
use fathom_core::config::StoreConfig;
use fathom_core::errors::FathomResult;

use crate::from_sqlite;

/// Apply all performance and safety pragmas to a connection.
pub fn apply_pragmas(conn: &Connection, config: &StoreConfig) -> FathomResult<()> {
    let journal_mode = if config.enable_wal { "WAL" } else { "DELETE" };
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = {journal_mode};
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = {cache_size};
        PRAGMA temp_store = MEMORY;
        PRAGMA mmap_size = {mmap_size};
        PRAGMA busy_timeout = {busy_timeout};
        PRAGMA foreign_keys = ON;
        ",
        cache_size = config.cache_size,
        mmap_size = DEFAULT_MMAP_SIZE,
        busy_timeout = config.busy_timeout,
    ))
    .map_err(from_sqlite)?;
    Ok(())
}

/// Report the journal mode active on a connection.
pub fn journal_mode(conn: &Connection) -> FathomResult<String> {
    conn.pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(from_sqlite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wal_mode_is_applied_on_files() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("pragma.db")).unwrap();
        apply_pragmas(&conn, &StoreConfig::default()).unwrap();
        assert!(journal_mode(&conn).unwrap().eq_ignore_ascii_case("wal"));
    }

    #[test]
    fn delete_mode_when_wal_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("pragma.db")).unwrap();
        let config = StoreConfig {
            enable_wal: false,
            ..Default::default()
        };
        apply_pragmas(&conn, &config).unwrap();
        assert!(journal_mode(&conn).unwrap().eq_ignore_ascii_case("delete"));
    }
}
