use serde::{Deserialize, Serialize};

use super::defaults;

/// Tokenizer behavior for the in-memory tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub lowercase: bool,
    pub remove_punctuation: bool,
    pub filter_stopwords: bool,
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub enable_chinese_segmentation: bool,
    /// Emit each unmatched CJK character as its own token instead of
    /// concatenating runs.
    pub keep_single_char: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: defaults::DEFAULT_LOWERCASE,
            remove_punctuation: defaults::DEFAULT_REMOVE_PUNCTUATION,
            filter_stopwords: defaults::DEFAULT_FILTER_STOPWORDS,
            min_token_length: defaults::DEFAULT_MIN_TOKEN_LENGTH,
            max_token_length: defaults::DEFAULT_MAX_TOKEN_LENGTH,
            enable_chinese_segmentation: defaults::DEFAULT_CHINESE_SEGMENTATION,
            keep_single_char: defaults::DEFAULT_KEEP_SINGLE_CHAR,
        }
    }
}

/// Okapi BM25 parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Config {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: defaults::DEFAULT_BM25_K1,
            b: defaults::DEFAULT_BM25_B,
        }
    }
}

/// ANN backend knobs. The flat reference backend uses only `vector_dim`
/// and `max_elements`; a production HNSW backend consumes the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswConfig {
    #[serde(rename = "M")]
    pub m: usize,
    pub ef_construction: usize,
    pub ef_query: usize,
    pub vector_dim: usize,
    pub max_elements: usize,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: defaults::DEFAULT_HNSW_M,
            ef_construction: defaults::DEFAULT_EF_CONSTRUCTION,
            ef_query: defaults::DEFAULT_EF_QUERY,
            vector_dim: defaults::DEFAULT_VECTOR_DIM,
            max_elements: defaults::DEFAULT_MAX_ELEMENTS,
        }
    }
}
