//! StoreEngine — owns the connection pool, applies pragmas and
//! migrations at open, probes the vector capability, and exposes the
//! three atomic corpus operations: batch insert, clear-all, search.

use std::path::Path;
use std::thread;

use tracing::{debug, info, warn};

use fathom_core::config::StoreConfig;
use fathom_core::errors::FathomResult;
use fathom_core::traits::IEmbeddingProvider;
use fathom_core::{Chunk, StoredChunk};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{chunk_ops, fts_search, hybrid, maintenance, vector_search};
use crate::to_storage_err;

const READ_POOL_SIZE: usize = 4;

/// Vector search capability, probed once at open.
///
/// `Degraded` means the handle is open but vector search is wholly
/// unavailable; text-only operations are still served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorCapability {
    Ready,
    Degraded,
}

/// Corpus statistics snapshot.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub total_embeddings: usize,
    pub db_size_mb: f64,
    pub last_update: Option<String>,
}

/// The persistent index over one SQLite database file.
pub struct StoreEngine {
    pool: ConnectionPool,
    vector_capability: VectorCapability,
    config: StoreConfig,
}

impl StoreEngine {
    /// Open (or create) the database at `config.db_path`.
    pub fn open(config: StoreConfig) -> FathomResult<Self> {
        let path = Path::new(&config.db_path).to_path_buf();
        let pool = ConnectionPool::open(&path, READ_POOL_SIZE, &config)?;
        Self::finish_open(pool, config)
    }

    /// Open an in-memory database (for testing). Reads route through
    /// the writer connection.
    pub fn open_in_memory(config: StoreConfig) -> FathomResult<Self> {
        let pool = ConnectionPool::open_in_memory(&config)?;
        Self::finish_open(pool, config)
    }

    fn finish_open(pool: ConnectionPool, config: StoreConfig) -> FathomResult<Self> {
        pool.writer.with_conn(migrations::run_migrations)?;
        let vector_capability = pool
            .writer
            .with_conn(|conn| Ok(probe_vector_capability(conn, &config)))?;
        info!(
            db_path = %config.db_path,
            fts5 = config.enable_fts5,
            vector = ?vector_capability,
            "store engine opened"
        );
        Ok(Self {
            pool,
            vector_capability,
            config,
        })
    }

    /// Insert a chunk batch in a single transaction and rebuild the FTS
    /// index after commit. Returns the assigned row ids in input order.
    pub fn insert_chunks(
        &self,
        chunks: &[Chunk],
        embedder: Option<&dyn IEmbeddingProvider>,
    ) -> FathomResult<Vec<i64>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        self.pool.writer.with_conn(|conn| {
            let ids = chunk_ops::insert_batch(conn, chunks, embedder)?;
            if self.config.enable_fts5 {
                fts_search::rebuild_index(conn)?;
            }
            debug!(inserted = ids.len(), "chunk batch committed");
            Ok(ids)
        })
    }

    /// BM25-ranked full-text search. Empty when FTS is disabled or the
    /// query is empty.
    pub fn search_fts(&self, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
        if !self.config.enable_fts5 || query.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        self.pool
            .with_read_conn(|conn| fts_search::search_fts(conn, query, limit))
    }

    /// Cosine-ranked vector search. Empty in the degraded state.
    pub fn search_vector(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> FathomResult<Vec<StoredChunk>> {
        if self.vector_capability == VectorCapability::Degraded {
            debug!("vector search skipped: capability degraded");
            return Ok(Vec::new());
        }
        self.pool
            .with_read_conn(|conn| vector_search::search_vector(conn, query_embedding, limit))
    }

    /// Hybrid search: FTS and vector sides fetched in parallel with
    /// their own limits, then merged with per-source weights. The legs
    /// land on separate read connections.
    pub fn search_hybrid(
        &self,
        query: &str,
        query_embedding: &[f32],
        fts_limit: usize,
        vector_limit: usize,
        fts_weight: f64,
        vector_weight: f64,
    ) -> FathomResult<Vec<StoredChunk>> {
        let (fts_outcome, vector_outcome) = thread::scope(|scope| {
            let fts_task = scope.spawn(|| self.search_fts(query, fts_limit));
            let vector_task = scope.spawn(|| self.search_vector(query_embedding, vector_limit));
            (fts_task.join(), vector_task.join())
        });
        let fts_results =
            fts_outcome.map_err(|_| to_storage_err("full-text search leg panicked".into()))??;
        let vector_results =
            vector_outcome.map_err(|_| to_storage_err("vector search leg panicked".into()))??;
        Ok(hybrid::merge_weighted(
            fts_results,
            vector_results,
            fts_weight,
            vector_weight,
        ))
    }

    /// Materialize rows by chunk id (database order).
    pub fn chunks_by_ids(&self, chunk_ids: &[i64]) -> FathomResult<Vec<StoredChunk>> {
        self.pool
            .with_read_conn(|conn| chunk_ops::chunks_by_ids(conn, chunk_ids))
    }

    /// All rows of one document, ordered by sequence number.
    pub fn chunks_by_doc_id(&self, doc_id: &str) -> FathomResult<Vec<StoredChunk>> {
        self.pool
            .with_read_conn(|conn| chunk_ops::chunks_by_doc_id(conn, doc_id))
    }

    /// Wipe the corpus and reclaim file space.
    pub fn clear_all(&self) -> FathomResult<()> {
        self.pool
            .writer
            .with_conn(|conn| maintenance::clear_all(conn, self.config.enable_fts5))
    }

    pub fn stats(&self) -> FathomResult<StoreStats> {
        self.pool.with_read_conn(maintenance::stats)
    }

    pub fn vector_capability(&self) -> VectorCapability {
        self.vector_capability
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Decide the vector capability for this handle.
///
/// The built-in scan needs no extension. Anything else is treated as a
/// loadable extension path; a failed load logs one warning and enters
/// the degraded state.
fn probe_vector_capability(conn: &rusqlite::Connection, config: &StoreConfig) -> VectorCapability {
    if config.uses_builtin_scan() {
        return VectorCapability::Ready;
    }
    match load_extension(conn, &config.vector_extension) {
        Ok(()) => {
            info!(extension = %config.vector_extension, "vector extension loaded");
            VectorCapability::Ready
        }
        Err(error) => {
            warn!(
                extension = %config.vector_extension,
                %error,
                "vector extension unavailable, continuing text-only"
            );
            VectorCapability::Degraded
        }
    }
}

fn load_extension(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<()> {
    unsafe {
        let _guard = rusqlite::LoadExtensionGuard::new(conn)?;
        conn.load_extension(Path::new(name), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_config() -> StoreConfig {
        StoreConfig {
            vector_extension: "scan".to_string(),
            ..Default::default()
        }
    }

    fn chunk(doc_id: &str, seq_no: u32, text: &str) -> Chunk {
        Chunk::new(doc_id, seq_no, text)
    }

    #[test]
    fn open_with_scan_backend_is_ready() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        assert_eq!(engine.vector_capability(), VectorCapability::Ready);
    }

    #[test]
    fn missing_extension_degrades_but_serves_text() {
        let config = StoreConfig {
            vector_extension: "definitely_not_a_real_extension".to_string(),
            ..Default::default()
        };
        let engine = StoreEngine::open_in_memory(config).unwrap();
        assert_eq!(engine.vector_capability(), VectorCapability::Degraded);

        engine
            .insert_chunks(&[chunk("d1", 0, "text only corpus")], None)
            .unwrap();
        assert!(engine.search_vector(&[0.1, 0.2], 5).unwrap().is_empty());
        assert_eq!(engine.search_fts("corpus", 5).unwrap().len(), 1);
    }

    #[test]
    fn insert_assigns_ids_in_input_order() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let ids = engine
            .insert_chunks(
                &[chunk("d1", 0, "first"), chunk("d1", 1, "second"), chunk("d2", 0, "third")],
                None,
            )
            .unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn fts_search_finds_matching_content() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        engine
            .insert_chunks(
                &[
                    chunk("d1", 0, "machine learning automates analytical model building"),
                    chunk("d2", 0, "the cat sat on the mat"),
                ],
                None,
            )
            .unwrap();
        let results = engine.search_fts("machine learning", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, "d1");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn empty_query_returns_empty() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        assert!(engine.search_fts("  ", 10).unwrap().is_empty());
    }

    #[test]
    fn stats_track_insert_counts() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let before = engine.stats().unwrap();
        assert_eq!(before.total_chunks, 0);

        engine
            .insert_chunks(&[chunk("d1", 0, "a"), chunk("d1", 1, "b")], None)
            .unwrap();
        let after = engine.stats().unwrap();
        assert_eq!(after.total_chunks, 2);
        assert!(after.last_update.is_some());
    }

    #[test]
    fn reingest_appends_rows() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        let batch = vec![chunk("d1", 0, "same identity")];
        engine.insert_chunks(&batch, None).unwrap();
        engine.insert_chunks(&batch, None).unwrap();
        assert_eq!(engine.stats().unwrap().total_chunks, 2);
    }

    #[test]
    fn clear_all_empties_every_table() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        engine
            .insert_chunks(&[chunk("d1", 0, "searchable content here")], None)
            .unwrap();
        engine.clear_all().unwrap();
        let stats = engine.stats().unwrap();
        assert_eq!(stats.total_chunks, 0);
        assert_eq!(stats.total_embeddings, 0);
        assert!(engine.search_fts("searchable", 10).unwrap().is_empty());
    }

    #[test]
    fn chunks_by_doc_id_orders_by_seq_no() {
        let engine = StoreEngine::open_in_memory(scan_config()).unwrap();
        engine
            .insert_chunks(
                &[chunk("d1", 2, "third"), chunk("d1", 0, "first"), chunk("d1", 1, "second")],
                None,
            )
            .unwrap();
        let rows = engine.chunks_by_doc_id("d1").unwrap();
        let seqs: Vec<u32> = rows.iter().map(|r| r.seq_no).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }
}
