//! Two-tier hybrid coordinator.
//!
//! Owns the in-memory tier (latency) and the persistent tier
//! (capacity): fans queries out to both in parallel, merges with
//! memory-tier precedence, tracks per-document access heat, and
//! promotes hot documents into the memory tier after each search.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use fathom_core::config::defaults::{DEFAULT_HOT_THRESHOLD, DEFAULT_MEMORY_CAPACITY};
use fathom_core::config::{RagConfig, TunerConfig};
use fathom_core::errors::{FathomResult, RetrievalError};
use fathom_core::traits::IEmbeddingProvider;
use fathom_core::{Chunk, ResultSource, RetrievalResult};
use fathom_index::{FlatVectorStore, FusionRetriever, HashedEmbedding};
use fathom_runtime::{AutoTuner, TunerParams, WorkerPool};
use fathom_store::StoreEngine;

use crate::store_retriever::StoreRetriever;

/// Per-document access accounting for hot/cold classification.
/// Process-local; resets on restart.
struct AccessStats {
    counts: HashMap<String, u32>,
    last_access: HashMap<String, Instant>,
}

impl AccessStats {
    fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_access: HashMap::new(),
        }
    }

    fn record(&mut self, doc_id: &str) {
        *self.counts.entry(doc_id.to_string()).or_insert(0) += 1;
        self.last_access.insert(doc_id.to_string(), Instant::now());
    }

    fn hot_documents(&self, threshold: u32) -> Vec<String> {
        self.counts
            .iter()
            .filter(|(_, count)| **count >= threshold)
            .map(|(doc_id, _)| doc_id.clone())
            .collect()
    }

    /// The least-recently-accessed document among `candidates`.
    /// Documents with no recorded access sort oldest.
    fn least_recently_accessed(&self, candidates: &HashSet<String>) -> Option<String> {
        candidates
            .iter()
            .min_by_key(|doc_id| self.last_access.get(*doc_id))
            .cloned()
    }
}

/// Documents currently resident in the memory tier.
struct MemoryTier {
    chunks: Vec<Chunk>,
    doc_ids: HashSet<String>,
}

/// Snapshot of the coordinator's state.
#[derive(Debug, Clone)]
pub struct HybridStats {
    pub persistent_chunks: usize,
    pub persistent_embeddings: usize,
    pub db_size_mb: f64,
    pub memory_docs: usize,
    pub hot_docs: usize,
    pub memory_utilization: f64,
}

/// Hot/cold re-balancing detached from the engine so it can run on the
/// worker pool without holding the engine itself.
#[derive(Clone)]
struct Rebalancer {
    memory: Arc<FusionRetriever>,
    persistent: Arc<StoreRetriever>,
    access: Arc<Mutex<AccessStats>>,
    tier: Arc<Mutex<MemoryTier>>,
    hot_threshold: u32,
    memory_capacity: usize,
}

impl Rebalancer {
    /// Promote hot documents into the memory tier and evict the
    /// least-recently-accessed ones past capacity. Promoting a document
    /// that is already resident is a no-op. Returns the promotion count.
    fn run(&self) -> FathomResult<usize> {
        let hot_docs = self.access.lock().hot_documents(self.hot_threshold);
        if hot_docs.is_empty() {
            return Ok(0);
        }

        let mut tier = self.tier.lock();
        let mut promoted = 0usize;
        for doc_id in hot_docs {
            if tier.doc_ids.contains(&doc_id) || tier.doc_ids.len() >= self.memory_capacity {
                continue;
            }
            let rows = self.persistent.get_documents_by_doc_id(&doc_id)?;
            if rows.is_empty() {
                continue;
            }
            for row in rows {
                tier.chunks.push(Chunk {
                    text: row.content,
                    doc_id: row.doc_id,
                    seq_no: row.seq_no,
                    topic: row.topic,
                    language: String::new(),
                    created_at: chrono::Utc::now().timestamp(),
                });
            }
            tier.doc_ids.insert(doc_id);
            promoted += 1;
        }

        let evicted = self.evict_past_capacity(&mut tier);
        if promoted > 0 || evicted > 0 {
            self.memory.fit(&tier.chunks);
            info!(
                promoted,
                evicted,
                resident = tier.doc_ids.len(),
                "memory tier rebalanced"
            );
        }
        Ok(promoted)
    }

    /// Drop least-recently-accessed documents until the tier fits its
    /// capacity. Returns the number of evicted documents.
    fn evict_past_capacity(&self, tier: &mut MemoryTier) -> usize {
        let mut evicted = 0usize;
        while tier.doc_ids.len() > self.memory_capacity {
            let victim = match self.access.lock().least_recently_accessed(&tier.doc_ids) {
                Some(doc_id) => doc_id,
                None => break,
            };
            tier.chunks.retain(|chunk| chunk.doc_id != victim);
            tier.doc_ids.remove(&victim);
            evicted += 1;
            debug!(doc_id = %victim, "evicted cold document from memory tier");
        }
        evicted
    }
}

/// The two-tier engine.
pub struct HybridEngine {
    memory: Arc<FusionRetriever>,
    persistent: Arc<StoreRetriever>,
    pool: Arc<WorkerPool>,
    access: Arc<Mutex<AccessStats>>,
    tier: Arc<Mutex<MemoryTier>>,
    hot_threshold: u32,
    memory_capacity: usize,
    tuner_config: TunerConfig,
    tuner: Mutex<Option<AutoTuner>>,
    /// Duration of the most recent search, in microseconds.
    search_latency_us: Arc<AtomicU64>,
}

impl HybridEngine {
    /// Open both tiers from configuration. Without an injected provider
    /// the hashed fallback embeds both tiers consistently.
    pub fn new(
        config: &RagConfig,
        embedder: Option<Arc<dyn IEmbeddingProvider>>,
    ) -> FathomResult<Self> {
        let engine = Arc::new(StoreEngine::open(config.sqlite.clone())?);
        Self::with_engine(config, engine, embedder)
    }

    /// Build both tiers over an already-open store engine.
    pub fn with_engine(
        config: &RagConfig,
        engine: Arc<StoreEngine>,
        embedder: Option<Arc<dyn IEmbeddingProvider>>,
    ) -> FathomResult<Self> {
        let embedder: Arc<dyn IEmbeddingProvider> = match embedder {
            Some(provider) => provider,
            None => Arc::new(HashedEmbedding::new(config.hnsw.vector_dim)),
        };
        let pool = Arc::new(WorkerPool::new(&config.threadpool));
        let memory = Arc::new(FusionRetriever::new(
            config,
            Box::new(FlatVectorStore::new(config.hnsw.vector_dim)),
            Arc::clone(&embedder),
            Arc::clone(&pool),
        )?);
        let persistent = Arc::new(StoreRetriever::new(
            config,
            engine,
            Some(embedder),
            Arc::clone(&pool),
        )?);
        info!("hybrid engine initialized");
        Ok(Self {
            memory,
            persistent,
            pool,
            access: Arc::new(Mutex::new(AccessStats::new())),
            tier: Arc::new(Mutex::new(MemoryTier {
                chunks: Vec::new(),
                doc_ids: HashSet::new(),
            })),
            hot_threshold: DEFAULT_HOT_THRESHOLD,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            tuner_config: config.tuner.clone(),
            tuner: Mutex::new(None),
            search_latency_us: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Override hot/cold policy knobs. Intended for use right after
    /// construction.
    pub fn with_policy(mut self, hot_threshold: u32, memory_capacity: usize) -> Self {
        self.hot_threshold = hot_threshold;
        self.memory_capacity = memory_capacity;
        self
    }

    /// Attach and start the auto-tuner with injected signal probes.
    /// Its published top-K widens the per-tier candidate breadth on the
    /// search path. A no-op when tuning is disabled in config or a
    /// tuner is already running.
    pub fn start_tuner(
        &self,
        latency_probe: impl Fn() -> f64 + Send + Sync + 'static,
        recall_probe: impl Fn() -> f64 + Send + Sync + 'static,
    ) {
        if !self.tuner_config.enable {
            return;
        }
        let mut tuner = self.tuner.lock();
        if tuner.is_some() {
            return;
        }
        let started = AutoTuner::new(self.tuner_config.clone(), latency_probe, recall_probe);
        started.start();
        *tuner = Some(started);
    }

    /// Stop and detach the auto-tuner, if running.
    pub fn stop_tuner(&self) {
        if let Some(tuner) = self.tuner.lock().take() {
            tuner.stop();
        }
    }

    /// Current tuned parameters, when a tuner is running.
    pub fn tuner_params(&self) -> Option<TunerParams> {
        self.tuner.lock().as_ref().map(|tuner| tuner.params())
    }

    /// Probe over this engine's own measured search latency, suitable
    /// for [`Self::start_tuner`]. Captures only the shared signal, not
    /// the engine.
    pub fn latency_probe(&self) -> impl Fn() -> f64 + Send + Sync + 'static {
        let signal = Arc::clone(&self.search_latency_us);
        move || signal.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// Write all chunks to the persistent tier, pre-seeding up to half
    /// of the memory-tier capacity from the batch.
    pub fn load_documents(&self, chunks: &[Chunk]) -> FathomResult<usize> {
        let inserted = self.persistent.insert_documents(chunks)?;

        let mut tier = self.tier.lock();
        if tier.doc_ids.len() < self.memory_capacity {
            let seed_cap = self.memory_capacity / 2;
            let mut seeded = 0usize;
            for chunk in chunks {
                if tier.chunks.len() >= seed_cap {
                    break;
                }
                tier.chunks.push(chunk.clone());
                tier.doc_ids.insert(chunk.doc_id.clone());
                seeded += 1;
            }
            if seeded > 0 {
                self.memory.fit(&tier.chunks);
                debug!(seeded, "memory tier pre-seeded");
            }
        }
        Ok(inserted)
    }

    /// Fan out to both tiers in parallel, merge with memory precedence,
    /// record access heat, and schedule distribution optimization.
    pub fn search(&self, query: &str, limit: usize) -> FathomResult<Vec<RetrievalResult>> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        // A running tuner can widen the per-tier candidate breadth; the
        // merge still trims to the caller's limit.
        let breadth = match self.tuner_params() {
            Some(params) => limit.max(params.top_k),
            None => limit,
        };

        let memory_populated = !self.tier.lock().doc_ids.is_empty();
        let (memory_outcome, persistent_outcome) = thread::scope(|scope| {
            let memory_task = scope.spawn(|| {
                if memory_populated {
                    self.memory.query(query, breadth)
                } else {
                    Ok(Vec::new())
                }
            });
            let persistent_task = scope.spawn(|| self.persistent.query(query, breadth));
            (memory_task.join(), persistent_task.join())
        });

        let memory_results = match memory_outcome {
            Ok(Ok(results)) => results,
            Ok(Err(error)) => {
                warn!(%error, "memory tier failed, serving persistent tier only");
                Vec::new()
            }
            Err(_) => {
                warn!("memory tier panicked, serving persistent tier only");
                Vec::new()
            }
        };
        let persistent_results = match persistent_outcome {
            Ok(Ok(results)) => results
                .into_iter()
                .map(|row| row.into_result(Some(ResultSource::Persistent)))
                .collect(),
            Ok(Err(error)) => {
                // A persistent-tier failure is only maskable when the
                // memory tier actually has an answer.
                if memory_results.is_empty() {
                    return Err(error);
                }
                warn!(%error, "persistent tier failed, serving memory tier only");
                Vec::new()
            }
            Err(_) => {
                if memory_results.is_empty() {
                    return Err(RetrievalError::TaskFailed {
                        reason: "persistent tier query panicked".into(),
                    }
                    .into());
                }
                Vec::new()
            }
        };

        let results = merge_tiers(memory_results, persistent_results, limit);

        {
            let mut access = self.access.lock();
            for result in &results {
                access.record(&result.doc_id);
            }
        }

        self.search_latency_us
            .store(started.elapsed().as_micros() as u64, Ordering::Relaxed);

        // Re-balance tiers off the query path.
        let rebalancer = self.rebalancer();
        self.pool.submit(move || {
            if let Err(error) = rebalancer.run() {
                warn!(%error, "distribution optimization failed");
            }
        });

        Ok(results)
    }

    /// Run the hot/cold re-balancing pass synchronously. Returns the
    /// number of promoted documents.
    pub fn optimize_data_distribution(&self) -> FathomResult<usize> {
        self.rebalancer().run()
    }

    /// Documents currently resident in the memory tier.
    pub fn memory_resident_docs(&self) -> HashSet<String> {
        self.tier.lock().doc_ids.clone()
    }

    pub fn persistent(&self) -> &Arc<StoreRetriever> {
        &self.persistent
    }

    pub fn stats(&self) -> FathomResult<HybridStats> {
        let store = self.persistent.get_stats()?;
        let tier = self.tier.lock();
        let hot = self.access.lock().hot_documents(self.hot_threshold);
        Ok(HybridStats {
            persistent_chunks: store.total_chunks,
            persistent_embeddings: store.total_embeddings,
            db_size_mb: store.db_size_mb,
            memory_docs: tier.doc_ids.len(),
            hot_docs: hot.len(),
            memory_utilization: if self.memory_capacity > 0 {
                tier.doc_ids.len() as f64 / self.memory_capacity as f64
            } else {
                0.0
            },
        })
    }

    fn rebalancer(&self) -> Rebalancer {
        Rebalancer {
            memory: Arc::clone(&self.memory),
            persistent: Arc::clone(&self.persistent),
            access: Arc::clone(&self.access),
            tier: Arc::clone(&self.tier),
            hot_threshold: self.hot_threshold,
            memory_capacity: self.memory_capacity,
        }
    }
}

/// Merge policy: memory-tier candidates win doc_key collisions,
/// persistent candidates fill the remainder, final order is by score
/// descending.
fn merge_tiers(
    memory_results: Vec<RetrievalResult>,
    persistent_results: Vec<RetrievalResult>,
    limit: usize,
) -> Vec<RetrievalResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<RetrievalResult> = Vec::new();

    for mut result in memory_results {
        if merged.len() >= limit {
            break;
        }
        if seen.insert(result.doc_key()) {
            result.source = Some(ResultSource::Memory);
            merged.push(result);
        }
    }
    for result in persistent_results {
        if merged.len() >= limit {
            break;
        }
        if seen.insert(result.doc_key()) {
            merged.push(result);
        }
    }

    merged.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged
}
