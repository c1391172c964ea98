use serde::{Deserialize, Serialize};

use super::defaults;

/// Fusion layer configuration for the in-memory tier.
///
/// `strategy` is kept as the raw config string here; `fathom-index`
/// parses it into its strategy enum (unknown values are rejected there).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub strategy: String,
    pub bm25_weight: f64,
    pub vector_weight: f64,
    /// Candidate breadth for each side of a fused query; clamped to at
    /// least the requested top-K at query time.
    pub max_candidates: usize,
    pub rrf_k: f64,
    /// Pluggable cross-encoder seam; parsed and exposed, not implemented.
    pub enable_rerank: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            strategy: defaults::DEFAULT_FUSION_STRATEGY.to_string(),
            bm25_weight: defaults::DEFAULT_BM25_WEIGHT,
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            max_candidates: defaults::DEFAULT_MAX_CANDIDATES,
            rrf_k: defaults::DEFAULT_RRF_K,
            enable_rerank: defaults::DEFAULT_ENABLE_RERANK,
        }
    }
}
