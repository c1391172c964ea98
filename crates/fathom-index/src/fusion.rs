//! Fusion retriever for the in-memory tier.
//!
//! `fit` populates both the BM25 index and the vector store; `query`
//! runs the configured strategy, fetching lexical and semantic
//! candidates in parallel for the fused paths and combining them with
//! weighted min-max normalization or reciprocal-rank fusion.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use fathom_core::config::RagConfig;
use fathom_core::errors::{FathomResult, IndexError, RetrievalError};
use fathom_core::traits::{EmbedKind, IEmbeddingProvider, IVectorStore, VectorRecord};
use fathom_core::{Chunk, RetrievalResult};
use fathom_runtime::{TaskHandle, WorkerPool};

use crate::bm25::Bm25Index;
use crate::embedding::HashedEmbedding;
use crate::tokenizer::Language;
use crate::vector::FlatVectorStore;

/// How lexical and semantic evidence are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionStrategy {
    Bm25Only,
    VectorOnly,
    /// Weighted fusion of min-max-normalized scores.
    Hybrid,
    /// Reciprocal-rank fusion.
    Rrf,
    /// Alias of the normalized weighted path.
    Weighted,
}

impl FusionStrategy {
    /// Parse the `[fusion] strategy` config value. Unknown values are
    /// rejected rather than silently defaulted.
    pub fn parse(value: &str) -> Result<Self, IndexError> {
        match value {
            "bm25_only" => Ok(Self::Bm25Only),
            "vector_only" => Ok(Self::VectorOnly),
            "hybrid" => Ok(Self::Hybrid),
            "rrf" => Ok(Self::Rrf),
            "weighted" => Ok(Self::Weighted),
            other => Err(IndexError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }

    fn is_fused(self) -> bool {
        matches!(self, Self::Hybrid | Self::Rrf | Self::Weighted)
    }
}

/// Orchestrates BM25 and vector retrieval over a fitted chunk set.
pub struct FusionRetriever {
    strategy: FusionStrategy,
    bm25_weight: f64,
    vector_weight: f64,
    max_candidates: usize,
    rrf_k: f64,
    bm25: Bm25Index,
    store: RwLock<Box<dyn IVectorStore>>,
    chunks: RwLock<Vec<Chunk>>,
    embedder: Arc<dyn IEmbeddingProvider>,
    pool: Arc<WorkerPool>,
}

impl FusionRetriever {
    /// Build a retriever with an injected vector store and embedding
    /// provider.
    pub fn new(
        config: &RagConfig,
        store: Box<dyn IVectorStore>,
        embedder: Arc<dyn IEmbeddingProvider>,
        pool: Arc<WorkerPool>,
    ) -> FathomResult<Self> {
        // The adaptive policy lives in the persistent retriever; the
        // memory tier falls back to hybrid fusion for that setting.
        let strategy = if config.fusion.strategy == "adaptive" {
            FusionStrategy::Hybrid
        } else {
            FusionStrategy::parse(&config.fusion.strategy)?
        };
        info!(
            ?strategy,
            bm25_weight = config.fusion.bm25_weight,
            vector_weight = config.fusion.vector_weight,
            provider = embedder.name(),
            "fusion retriever created"
        );
        Ok(Self {
            strategy,
            bm25_weight: config.fusion.bm25_weight,
            vector_weight: config.fusion.vector_weight,
            max_candidates: config.fusion.max_candidates,
            rrf_k: config.fusion.rrf_k,
            bm25: Bm25Index::new(&config.bm25),
            store: RwLock::new(store),
            chunks: RwLock::new(Vec::new()),
            embedder,
            pool,
        })
    }

    /// Build a retriever with the flat reference store and the hashed
    /// fallback provider.
    pub fn from_config(config: &RagConfig, pool: Arc<WorkerPool>) -> FathomResult<Self> {
        let dim = config.hnsw.vector_dim;
        Self::new(
            config,
            Box::new(FlatVectorStore::new(dim)),
            Arc::new(HashedEmbedding::new(dim)),
            pool,
        )
    }

    /// Rebuild both indexes from a chunk sequence. Embedding failures
    /// are logged per chunk; the chunk still participates in BM25.
    pub fn fit(&self, chunks: &[Chunk]) {
        self.bm25.fit(chunks);

        let mut store = self.store.write();
        store.reset();
        for (i, chunk) in chunks.iter().enumerate() {
            match self.embedder.embed(&chunk.text, EmbedKind::Document) {
                Ok(vector) if !vector.is_empty() => {
                    store.insert(
                        vector,
                        i as u64,
                        VectorRecord {
                            doc_id: chunk.doc_id.clone(),
                            seq_no: chunk.seq_no,
                            content: chunk.text.clone(),
                        },
                    );
                }
                Ok(_) => {
                    warn!(doc_id = %chunk.doc_id, seq_no = chunk.seq_no, "empty embedding, chunk indexed for text only");
                }
                Err(error) => {
                    warn!(doc_id = %chunk.doc_id, seq_no = chunk.seq_no, %error, "embedding failed, chunk indexed for text only");
                }
            }
        }
        drop(store);

        *self.chunks.write() = chunks.to_vec();
        debug!(chunks = chunks.len(), "fusion retriever fitted");
    }

    /// Top-K results for a query, ordered by fused score descending.
    pub fn query(&self, text: &str, top_k: usize) -> FathomResult<Vec<RetrievalResult>> {
        if text.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery.into());
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        match self.strategy {
            FusionStrategy::Bm25Only => Ok(self.bm25_retrieve(text, top_k)),
            FusionStrategy::VectorOnly => Ok(self.vector_retrieve(text, top_k)),
            _ => {
                let breadth = self.max_candidates.max(top_k);
                let (bm25_results, vector_results) = thread::scope(|scope| {
                    let bm25_task = scope.spawn(|| self.bm25_retrieve(text, breadth));
                    let vector_task = scope.spawn(|| self.vector_retrieve(text, breadth));
                    (bm25_task.join(), vector_task.join())
                });
                let bm25_results = bm25_results.map_err(|_| RetrievalError::TaskFailed {
                    reason: "bm25 candidate retrieval panicked".into(),
                })?;
                let vector_results = vector_results.map_err(|_| RetrievalError::TaskFailed {
                    reason: "vector candidate retrieval panicked".into(),
                })?;
                Ok(self.fuse_results(bm25_results, vector_results, top_k))
            }
        }
    }

    /// Submit a query to the worker pool and return its handle.
    pub fn query_async(
        retriever: &Arc<Self>,
        text: impl Into<String>,
        top_k: usize,
    ) -> TaskHandle<FathomResult<Vec<RetrievalResult>>> {
        let owned = Arc::clone(retriever);
        let text = text.into();
        retriever.pool.submit(move || owned.query(&text, top_k))
    }

    pub fn strategy(&self) -> FusionStrategy {
        self.strategy
    }

    /// Number of fitted chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    fn bm25_retrieve(&self, text: &str, top_k: usize) -> Vec<RetrievalResult> {
        let scored = self.bm25.query_text(text, top_k, Language::Auto);
        let chunks = self.chunks.read();
        scored
            .into_iter()
            .filter_map(|(idx, score)| {
                chunks.get(idx).map(|chunk| {
                    RetrievalResult::new(chunk.doc_id.clone(), chunk.seq_no, score, chunk.text.clone())
                })
            })
            .collect()
    }

    fn vector_retrieve(&self, text: &str, top_k: usize) -> Vec<RetrievalResult> {
        let query_vector = match self.embedder.embed(text, EmbedKind::Query) {
            Ok(vector) if !vector.is_empty() => vector,
            Ok(_) => {
                warn!("query embedding empty, vector candidates skipped");
                return Vec::new();
            }
            Err(error) => {
                warn!(%error, "query embedding failed, vector candidates skipped");
                return Vec::new();
            }
        };
        self.store
            .read()
            .search(&query_vector, top_k)
            .into_iter()
            .map(|hit| {
                RetrievalResult::new(
                    hit.record.doc_id,
                    hit.record.seq_no,
                    hit.similarity,
                    hit.record.content,
                )
            })
            .collect()
    }

    fn fuse_results(
        &self,
        bm25_results: Vec<RetrievalResult>,
        vector_results: Vec<RetrievalResult>,
        top_k: usize,
    ) -> Vec<RetrievalResult> {
        debug_assert!(self.strategy.is_fused());
        match self.strategy {
            FusionStrategy::Rrf => self.rrf_fusion(bm25_results, vector_results, top_k),
            _ => self.weighted_fusion(bm25_results, vector_results, top_k),
        }
    }

    /// Weighted sum of min-max-normalized scores, de-duplicated by
    /// `(doc_id, seq_no)`.
    fn weighted_fusion(
        &self,
        mut bm25_results: Vec<RetrievalResult>,
        mut vector_results: Vec<RetrievalResult>,
        top_k: usize,
    ) -> Vec<RetrievalResult> {
        normalize_scores(&mut bm25_results);
        normalize_scores(&mut vector_results);

        let mut doc_scores: HashMap<String, f64> = HashMap::new();
        let mut doc_map: HashMap<String, RetrievalResult> = HashMap::new();

        for result in bm25_results {
            let key = result.doc_key();
            *doc_scores.entry(key.clone()).or_default() += self.bm25_weight * result.score;
            doc_map.entry(key).or_insert(result);
        }
        for result in vector_results {
            let key = result.doc_key();
            *doc_scores.entry(key.clone()).or_default() += self.vector_weight * result.score;
            doc_map.entry(key).or_insert(result);
        }

        rank_and_trim(doc_scores, doc_map, top_k)
    }

    /// Reciprocal-rank fusion: each list contributes
    /// `weight / (rrf_k + rank + 1)` per document.
    fn rrf_fusion(
        &self,
        bm25_results: Vec<RetrievalResult>,
        vector_results: Vec<RetrievalResult>,
        top_k: usize,
    ) -> Vec<RetrievalResult> {
        let mut doc_scores: HashMap<String, f64> = HashMap::new();
        let mut doc_map: HashMap<String, RetrievalResult> = HashMap::new();

        for (rank, result) in bm25_results.into_iter().enumerate() {
            let key = result.doc_key();
            *doc_scores.entry(key.clone()).or_default() +=
                self.bm25_weight / (self.rrf_k + rank as f64 + 1.0);
            doc_map.entry(key).or_insert(result);
        }
        for (rank, result) in vector_results.into_iter().enumerate() {
            let key = result.doc_key();
            *doc_scores.entry(key.clone()).or_default() +=
                self.vector_weight / (self.rrf_k + rank as f64 + 1.0);
            doc_map.entry(key).or_insert(result);
        }

        rank_and_trim(doc_scores, doc_map, top_k)
    }
}

/// Min-max normalize a result list to `[0, 1]`; a list with all-equal
/// scores normalizes to 0.
fn normalize_scores(results: &mut [RetrievalResult]) {
    let Some(first) = results.first() else { return };
    let mut min = first.score;
    let mut max = first.score;
    for result in results.iter() {
        min = min.min(result.score);
        max = max.max(result.score);
    }
    let range = max - min;
    for result in results.iter_mut() {
        result.score = if range > 0.0 {
            (result.score - min) / range
        } else {
            0.0
        };
    }
}

fn rank_and_trim(
    doc_scores: HashMap<String, f64>,
    mut doc_map: HashMap<String, RetrievalResult>,
    top_k: usize,
) -> Vec<RetrievalResult> {
    let mut ranked: Vec<(String, f64)> = doc_scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
        .into_iter()
        .take(top_k)
        .filter_map(|(key, score)| {
            doc_map.remove(&key).map(|mut result| {
                result.score = score;
                result
            })
        })
        .collect()
}
