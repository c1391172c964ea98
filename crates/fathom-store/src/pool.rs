//! Connection handling: a single mutex-guarded write connection plus a
//! small round-robin pool of read connections. Writes serialize on the
//! writer mutex; reads bypass it and rely on WAL for isolation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rusqlite::Connection;

use fathom_core::config::StoreConfig;
use fathom_core::errors::{FathomResult, StorageError};

use crate::pragmas::apply_pragmas;

/// The single write connection, protected by a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, config: &StoreConfig) -> FathomResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(config: &StoreConfig) -> FathomResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::OpenFailed {
            path: ":memory:".to_string(),
            reason: e.to_string(),
        })?;
        apply_pragmas(&conn, config)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and run a closure against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> FathomResult<T>
    where
        F: FnOnce(&Connection) -> FathomResult<T>,
    {
        let guard = self.conn.lock();
        f(&guard)
    }
}

/// Round-robin pool of read connections. Empty for in-memory databases,
/// where reads route through the writer instead.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    pub fn open(path: &Path, size: usize, config: &StoreConfig) -> FathomResult<Self> {
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            apply_pragmas(&conn, config)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Self {
        Self {
            connections: Vec::new(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Run a closure against the next read connection.
    pub fn with_conn<F, T>(&self, f: F) -> FathomResult<T>
    where
        F: FnOnce(&Connection) -> FathomResult<T>,
    {
        debug_assert!(!self.connections.is_empty());
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[index].lock();
        f(&guard)
    }
}

/// The writer plus readers for one database file.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize, config: &StoreConfig) -> FathomResult<Self> {
        let writer = WriteConnection::open(path, config)?;
        let readers = ReadPool::open(path, read_pool_size, config)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// In-memory pool for testing. Readers would see a different
    /// database, so all access routes through the writer.
    pub fn open_in_memory(config: &StoreConfig) -> FathomResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory(config)?,
            readers: ReadPool::empty(),
            db_path: None,
        })
    }

    /// Run a read closure, bypassing the writer mutex when a read pool
    /// is available.
    pub fn with_read_conn<F, T>(&self, f: F) -> FathomResult<T>
    where
        F: FnOnce(&Connection) -> FathomResult<T>,
    {
        if self.readers.is_empty() {
            self.writer.with_conn(f)
        } else {
            self.readers.with_conn(f)
        }
    }
}
