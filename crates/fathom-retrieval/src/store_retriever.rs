//! Caching, strategy-aware retriever over the persistent index.
//!
//! Wraps [`StoreEngine`] with result caching (ids only), adaptive
//! strategy selection, warmup, and asynchronous entry points backed by
//! the shared worker pool.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use fathom_core::config::RagConfig;
use fathom_core::errors::{FathomResult, RetrievalError};
use fathom_core::traits::{EmbedKind, IEmbeddingProvider};
use fathom_core::{Chunk, StoredChunk};
use fathom_runtime::{LruCache, TaskHandle, WorkerPool};
use fathom_store::{StoreEngine, StoreStats};

use crate::strategy::{choose_strategy, RetrievalStrategy};

/// Sample queries used when `warmup` is called without any.
const DEFAULT_WARMUP_QUERIES: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "deep learning",
    "natural language processing",
];

/// Persistent-retriever knobs, derived from the engine config.
#[derive(Debug, Clone)]
pub struct StoreRetrieverConfig {
    pub strategy: RetrievalStrategy,
    pub fts_weight: f64,
    pub vector_weight: f64,
    /// Result count when the caller does not pass a limit.
    pub max_results: usize,
    pub enable_cache: bool,
}

impl Default for StoreRetrieverConfig {
    fn default() -> Self {
        use fathom_core::config::defaults;
        Self {
            strategy: RetrievalStrategy::Hybrid,
            fts_weight: defaults::DEFAULT_FTS5_WEIGHT,
            vector_weight: defaults::DEFAULT_PERSISTENT_VECTOR_WEIGHT,
            max_results: defaults::DEFAULT_MAX_RESULTS,
            enable_cache: true,
        }
    }
}

impl StoreRetrieverConfig {
    /// Derive from the engine config: the `[fusion]` strategy and
    /// weights carry over to this tier.
    pub fn from_rag_config(config: &RagConfig) -> FathomResult<Self> {
        Ok(Self {
            strategy: RetrievalStrategy::parse(&config.fusion.strategy)?,
            fts_weight: config.fusion.bm25_weight,
            vector_weight: config.fusion.vector_weight,
            ..Default::default()
        })
    }
}

/// Cached value: ordered chunk ids plus the time they were ranked.
#[derive(Clone)]
struct CachedRetrieval {
    chunk_ids: Vec<i64>,
    #[allow(dead_code)]
    cached_at: i64,
}

/// The persistent retriever.
pub struct StoreRetriever {
    engine: Arc<StoreEngine>,
    config: StoreRetrieverConfig,
    cache: LruCache<CachedRetrieval>,
    pool: Arc<WorkerPool>,
    embedder: RwLock<Option<Arc<dyn IEmbeddingProvider>>>,
    initialized: AtomicBool,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl StoreRetriever {
    pub fn new(
        rag_config: &RagConfig,
        engine: Arc<StoreEngine>,
        embedder: Option<Arc<dyn IEmbeddingProvider>>,
        pool: Arc<WorkerPool>,
    ) -> FathomResult<Self> {
        let config = StoreRetrieverConfig::from_rag_config(rag_config)?;
        Ok(Self {
            engine,
            config,
            cache: LruCache::new(&rag_config.cache),
            pool,
            embedder: RwLock::new(embedder),
            initialized: AtomicBool::new(false),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        })
    }

    /// Open the database from config and wrap it.
    pub fn open(
        rag_config: &RagConfig,
        embedder: Option<Arc<dyn IEmbeddingProvider>>,
        pool: Arc<WorkerPool>,
    ) -> FathomResult<Self> {
        let engine = Arc::new(StoreEngine::open(rag_config.sqlite.clone())?);
        Self::new(rag_config, engine, embedder, pool)
    }

    /// Verify the store answers and mark the retriever ready. Runs
    /// lazily from the query paths, so calling it up front is optional.
    pub fn initialize(&self) -> FathomResult<()> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        self.engine.stats().map_err(|e| RetrievalError::NotInitialized {
            reason: e.to_string(),
        })?;
        self.initialized.store(true, Ordering::Release);
        info!("store retriever initialized");
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Swap the embedding provider.
    pub fn set_embedding_provider(&self, embedder: Arc<dyn IEmbeddingProvider>) {
        *self.embedder.write() = Some(embedder);
        info!("embedding provider updated");
    }

    /// Insert a chunk batch and invalidate the result cache.
    pub fn insert_documents(&self, chunks: &[Chunk]) -> FathomResult<usize> {
        self.initialize()?;
        let started = Instant::now();
        let embedder = self.embedder.read().clone();
        let ids = self.engine.insert_chunks(chunks, embedder.as_deref())?;
        self.cache.clear();
        info!(
            inserted = ids.len(),
            total = chunks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "documents inserted"
        );
        Ok(ids.len())
    }

    /// Ranked retrieval with caching and strategy selection.
    pub fn query(&self, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
        self.initialize()?;
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let strategy = match self.config.strategy {
            RetrievalStrategy::Adaptive => choose_strategy(query),
            fixed => fixed,
        };
        let cache_key = cache_key(query, strategy, limit);

        if self.config.enable_cache {
            if let Some(cached) = self.cache.get(&cache_key) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                info!(query, "cache hit");
                return self.materialize(&cached.chunk_ids);
            }
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }

        let started = Instant::now();
        let results = match strategy {
            RetrievalStrategy::FtsOnly => self.query_text_only(query, limit)?,
            RetrievalStrategy::VectorOnly => self.query_vector_only(query, limit)?,
            _ => self.query_hybrid(query, limit)?,
        };
        info!(
            query,
            ?strategy,
            results = results.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "query executed"
        );

        if self.config.enable_cache {
            self.cache.put(
                cache_key,
                CachedRetrieval {
                    chunk_ids: results.iter().map(|r| r.chunk_id).collect(),
                    cached_at: Utc::now().timestamp(),
                },
            );
        }
        Ok(results)
    }

    /// Submit a query to the worker pool and return its handle.
    pub fn query_async(
        retriever: &Arc<Self>,
        query: impl Into<String>,
        limit: usize,
    ) -> TaskHandle<FathomResult<Vec<StoredChunk>>> {
        let owned = Arc::clone(retriever);
        let query = query.into();
        retriever.pool.submit(move || owned.query(&query, limit))
    }

    /// Full-text search only.
    pub fn query_text_only(&self, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
        self.engine.search_fts(query, limit)
    }

    /// Vector search only. Missing provider or empty query embedding
    /// yields an empty list, not a failure.
    pub fn query_vector_only(&self, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
        let Some(embedding) = self.query_embedding(query) else {
            return Ok(Vec::new());
        };
        self.engine.search_vector(&embedding, limit)
    }

    /// Hybrid search; downgrades to text-only when no query embedding
    /// is available.
    pub fn query_hybrid(&self, query: &str, limit: usize) -> FathomResult<Vec<StoredChunk>> {
        let Some(embedding) = self.query_embedding(query) else {
            info!("no query embedding, falling back to text-only search");
            return self.query_text_only(query, limit);
        };
        let store_config = self.engine.config();
        let mut results = self.engine.search_hybrid(
            query,
            &embedding,
            store_config.fts5_limit.max(limit),
            store_config.vector_limit.max(limit),
            self.config.fts_weight,
            self.config.vector_weight,
        )?;
        results.truncate(limit);
        Ok(results)
    }

    /// Materialize rows by id (cache hit path).
    pub fn get_documents_by_ids(&self, chunk_ids: &[i64]) -> FathomResult<Vec<StoredChunk>> {
        self.materialize(chunk_ids)
    }

    /// All rows of one document, ordered by sequence number.
    pub fn get_documents_by_doc_id(&self, doc_id: &str) -> FathomResult<Vec<StoredChunk>> {
        self.engine.chunks_by_doc_id(doc_id)
    }

    /// Wipe the corpus and the cache.
    pub fn clear_all_data(&self) -> FathomResult<()> {
        self.initialize()?;
        self.engine.clear_all()?;
        self.cache.clear();
        Ok(())
    }

    pub fn get_stats(&self) -> FathomResult<StoreStats> {
        self.engine.stats()
    }

    /// `(hits, misses)` counters for the result cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        (
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
        )
    }

    /// Prime the cache with sample queries (or a default set).
    pub fn warmup(&self, sample_queries: &[String]) {
        let defaults: Vec<String> = DEFAULT_WARMUP_QUERIES.iter().map(|s| s.to_string()).collect();
        let queries = if sample_queries.is_empty() {
            &defaults
        } else {
            sample_queries
        };
        let started = Instant::now();
        for query in queries {
            if let Err(error) = self.query(query, 5) {
                debug!(query, %error, "warmup query failed");
            }
        }
        info!(
            queries = queries.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "warmup complete"
        );
    }

    fn query_embedding(&self, query: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.read().clone()?;
        match embedder.embed(query, EmbedKind::Query) {
            Ok(embedding) if !embedding.is_empty() => Some(embedding),
            Ok(_) => {
                warn!("query embedding empty");
                None
            }
            Err(error) => {
                warn!(%error, "query embedding failed");
                None
            }
        }
    }

    /// Fetch rows for the given ids, preserving the id order.
    fn materialize(&self, chunk_ids: &[i64]) -> FathomResult<Vec<StoredChunk>> {
        let rows = self.engine.chunks_by_ids(chunk_ids)?;
        let mut by_id: HashMap<i64, StoredChunk> = rows
            .into_iter()
            .map(|row| (row.chunk_id, row))
            .collect();
        Ok(chunk_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect())
    }
}

fn cache_key(query: &str, strategy: RetrievalStrategy, limit: usize) -> String {
    format!("q:{query}|s:{}|l:{limit}", strategy.ordinal())
}
